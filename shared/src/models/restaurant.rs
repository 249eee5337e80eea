//! Restaurant branch model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag key marking the Stripe customer of a branch
pub const STRIPE_ID_TAG: &str = "StripeId";

/// Buyer location placing ordenes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantBranch {
    pub id: Uuid,
    pub restaurant_business_id: Uuid,
    pub branch_name: String,
    pub full_address: String,
    /// Address used for orden confirmation emails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// Free-form key/value tag attached to a branch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchTag {
    pub restaurant_branch_id: Uuid,
    pub tag_key: String,
    pub tag_value: String,
}

/// Find the value of `key` among `tags`
pub fn find_tag<'a>(tags: &'a [BranchTag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|t| t.tag_key == key)
        .map(|t| t.tag_value.as_str())
}
