//! Push-channel message types
//!
//! Every state transition committed by the order engine is announced to
//! all connected station displays as a `{type, data}` JSON envelope.
//! Delivery is best-effort: no persistence, no acknowledgment, no replay.
//! A display that was briefly disconnected reconciles via a full refetch.

use crate::models::Station;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope type sent once when a connection is established
pub const CONNECTION_EVENT: &str = "connection";

/// Order lifecycle events carried over the push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderEventKind {
    New,
    Update,
    Cancel,
    Served,
    Done,
    Completed,
    Delete,
}

impl OrderEventKind {
    /// Wire name of the event type
    pub const fn as_type(&self) -> &'static str {
        match self {
            OrderEventKind::New => "order:new",
            OrderEventKind::Update => "order:update",
            OrderEventKind::Cancel => "order:cancel",
            OrderEventKind::Served => "order:served",
            OrderEventKind::Done => "order:done",
            OrderEventKind::Completed => "order:completed",
            OrderEventKind::Delete => "order:delete",
        }
    }
}

/// Wire name of a station clear signal ("grill:clear", "kitchen:clear")
pub fn clear_event_type(station: Station) -> String {
    format!("{}:clear", station)
}

/// The `{type, data}` envelope pushed to every subscriber
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Value,
}

impl PushEnvelope {
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// One-time greeting sent when a subscriber attaches
    pub fn greeting() -> Self {
        Self::new(
            CONNECTION_EVENT,
            serde_json::json!({ "message": "connection established" }),
        )
    }
}

/// Payload of a station clear signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationClearPayload {
    pub station: Station,
    /// Number of open orders the clear touched
    pub affected: u64,
}

/// Payload of an `order:delete` event (the order is gone; only the id travels)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDeletedPayload {
    pub id: String,
}
