//! Product status lifecycle values.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a product.
///
/// `Deleted` is a soft-state marker only: no operation in this system
/// sets it, and products are never physically removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Moderation,
    Available,
    SoldOut,
    OnHold,
    Deleted,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moderation => "MODERATION",
            Self::Available => "AVAILABLE",
            Self::SoldOut => "SOLD_OUT",
            Self::OnHold => "ON_HOLD",
            Self::Deleted => "DELETED",
        }
    }

    /// Parse a status string, returning `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MODERATION" => Some(Self::Moderation),
            "AVAILABLE" => Some(Self::Available),
            "SOLD_OUT" => Some(Self::SoldOut),
            "ON_HOLD" => Some(Self::OnHold),
            "DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl Default for ProductStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
