//! Guest profile set by the front-desk operator.

use serde::{Deserialize, Serialize};

use crate::ParseLabelError;

/// Loyalty programme tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoyaltyTier {
    #[default]
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }
}

impl std::fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoyaltyTier {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Silver" => Ok(Self::Silver),
            "Gold" => Ok(Self::Gold),
            "Platinum" => Ok(Self::Platinum),
            _ => Err(ParseLabelError::new("loyalty tier", s)),
        }
    }
}

/// The guest occupying the session's room.
///
/// Read-only to the classifier; only the operator changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestProfile {
    pub name: String,
    pub tier: LoyaltyTier,
    pub late_checkout: bool,
}

impl GuestProfile {
    pub fn new(name: impl Into<String>, tier: LoyaltyTier, late_checkout: bool) -> Self {
        Self {
            name: name.into(),
            tier,
            late_checkout,
        }
    }
}

impl Default for GuestProfile {
    fn default() -> Self {
        Self::new("Alex", LoyaltyTier::Silver, true)
    }
}
