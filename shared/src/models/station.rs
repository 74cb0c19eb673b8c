//! Preparation stations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Preparation station a menu item is routed to
///
/// An order fans out to every station referenced by its items; each
/// station display sees the order with only its own items (the ticket).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Station {
    Grill,
    Kitchen,
    Beverage,
}

impl Station {
    /// Wire representation (matches the serde rename)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Station::Grill => "grill",
            Station::Kitchen => "kitchen",
            Station::Beverage => "beverage",
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Station {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grill" => Ok(Station::Grill),
            "kitchen" => Ok(Station::Kitchen),
            "beverage" => Ok(Station::Beverage),
            other => Err(format!("unknown station: {}", other)),
        }
    }
}
