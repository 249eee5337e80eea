//! Product signatures: "same product" across suppliers

use shared::orden::SellUnit;

/// Normalized `(description, sell_unit)` key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductSignature {
    description: String,
    sell_unit: SellUnit,
}

impl ProductSignature {
    pub fn new(description: &str, sell_unit: SellUnit) -> Self {
        Self {
            description: normalize(description),
            sell_unit,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Lowercase, trimmed, single-spaced
fn normalize(description: &str) -> String {
    description
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
