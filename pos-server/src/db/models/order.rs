//! Order model
//!
//! Orders embed their items. Ownership is structural: deleting the order
//! record removes its items with it, and a bulk item replacement is one
//! atomic record update rather than a delete step followed by inserts.

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{OrderItemStatus, OrderStatus, Station};
use surrealdb::RecordId;

/// A line within an order
///
/// `name`, `station` and `price` are snapshots taken from the menu item
/// at creation time; the `menu_item_id` is a reference, not ownership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Line id (uuid), unique within the order
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    pub station: Station,
    /// Price snapshot, immune to later catalog edits
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Persisted but not independently transitioned (reserved)
    #[serde(default)]
    pub status: OrderItemStatus,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A customer check - the aggregate root
///
/// Invariant: `total_price == Σ item.price × item.quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Human-facing ticket number, scoped to the calendar day
    pub order_number: u64,
    pub status: OrderStatus,
    /// Absent means takeaway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    /// Cached sum of the item line totals
    pub total_price: Decimal,
    /// Owning server ("user:id")
    pub server_id: String,
    /// Display-name snapshot of the owning server
    pub server_name: String,
    pub items: Vec<OrderItem>,
    /// Unix milliseconds
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Sum of line totals; the cached `total_price` must always equal this
    pub fn compute_total(items: &[OrderItem]) -> Decimal {
        items.iter().map(OrderItem::line_total).sum()
    }

    /// The record id in "order:id" string form
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Stations referenced by at least one item
    pub fn stations(&self) -> Vec<Station> {
        let mut stations: Vec<Station> = Vec::new();
        for item in &self.items {
            if !stations.contains(&item.station) {
                stations.push(item.station);
            }
        }
        stations
    }

    /// Whether any item routes to `station`
    pub fn touches_station(&self, station: Station) -> bool {
        self.items.iter().any(|i| i.station == station)
    }

    /// Copy of this order with the item list narrowed to one station
    /// (the ticket a station display renders)
    pub fn ticket_for(&self, station: Station) -> Order {
        let mut ticket = self.clone();
        ticket.items.retain(|i| i.station == station);
        ticket
    }
}
