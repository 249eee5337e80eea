//! Core user model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform identity shared by restaurant and supplier users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// External authentication id (identity provider uid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
}

impl CoreUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
