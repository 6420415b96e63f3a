use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Two-state visibility flag shared by categories, subcategories and customers.
///
/// Deserialization is case-insensitive because the subcategory endpoint has
/// been seen returning `"Active"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ActiveStatus {
    #[default]
    Active,
    Inactive,
}

impl ActiveStatus {
    /// The other state. Toggling is always between exactly these two.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ActiveStatus::Active => ActiveStatus::Inactive,
            ActiveStatus::Inactive => ActiveStatus::Active,
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        self == ActiveStatus::Active
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveStatus::Active => "active",
            ActiveStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for ActiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActiveStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ActiveStatus::Active),
            "inactive" => Ok(ActiveStatus::Inactive),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for ActiveStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Coupon lifecycle. `Expired` is set by the server and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CouponStatus {
    #[default]
    Active,
    Inactive,
    Expired,
}

impl CouponStatus {
    /// The toggleable view of this status; `None` for `Expired`.
    #[must_use]
    pub fn as_active(self) -> Option<ActiveStatus> {
        match self {
            CouponStatus::Active => Some(ActiveStatus::Active),
            CouponStatus::Inactive => Some(ActiveStatus::Inactive),
            CouponStatus::Expired => None,
        }
    }
}

impl From<ActiveStatus> for CouponStatus {
    fn from(status: ActiveStatus) -> Self {
        match status {
            ActiveStatus::Active => CouponStatus::Active,
            ActiveStatus::Inactive => CouponStatus::Inactive,
        }
    }
}

impl std::fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouponStatus::Active => write!(f, "active"),
            CouponStatus::Inactive => write!(f, "inactive"),
            CouponStatus::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for CouponStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(CouponStatus::Active),
            "inactive" => Ok(CouponStatus::Inactive),
            "expired" => Ok(CouponStatus::Expired),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for CouponStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
