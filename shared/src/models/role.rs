//! Actor roles

use super::station::Station;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actor role - exactly one per user, from a closed set
///
/// Role determines which order operations are authorized
/// (see the policy table in the server's `auth::policy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Server,
    Cashier,
    GrillCook,
    KitchenStaff,
}

impl Role {
    /// The preparation station this role works, if any
    pub fn station(&self) -> Option<Station> {
        match self {
            Role::GrillCook => Some(Station::Grill),
            Role::KitchenStaff => Some(Station::Kitchen),
            Role::Owner | Role::Server | Role::Cashier => None,
        }
    }

    /// Wire representation (matches the serde rename)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Server => "SERVER",
            Role::Cashier => "CASHIER",
            Role::GrillCook => "GRILL_COOK",
            Role::KitchenStaff => "KITCHEN_STAFF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OWNER" => Ok(Role::Owner),
            "SERVER" => Ok(Role::Server),
            "CASHIER" => Ok(Role::Cashier),
            "GRILL_COOK" => Ok(Role::GrillCook),
            "KITCHEN_STAFF" => Ok(Role::KitchenStaff),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
