//! Order status state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// ```text
/// OPEN ──▶ SERVED ──▶ COMPLETED
///   │          (checkout)
///   ├──▶ DONE        (terminal)
///   ├──▶ CANCELLED   (terminal)
///   └──▶ COMPLETED   (checkout straight from OPEN)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    Served,
    Done,
    Cancelled,
    Completed,
}

impl OrderStatus {
    /// Terminal statuses admit no further transition
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Done | OrderStatus::Cancelled | OrderStatus::Completed
        )
    }

    /// Whether the state machine permits `self -> next`
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (
                OrderStatus::Open,
                OrderStatus::Served
                | OrderStatus::Done
                | OrderStatus::Cancelled
                | OrderStatus::Completed,
            ) => true,
            (OrderStatus::Served, OrderStatus::Completed) => true,
            _ => false,
        }
    }

    /// Wire representation (matches the serde rename)
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Served => "SERVED",
            OrderStatus::Done => "DONE",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-item status within an order
///
/// Persisted at item creation and currently never transitioned
/// independently of the parent order; reserved for future per-item
/// prep tracking on station displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderItemStatus {
    #[default]
    Pending,
    Ready,
}
