//! Menu item model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::Station;
use surrealdb::RecordId;

/// Catalog entry
///
/// The order engine only reads these; every order item captures a price
/// (and name/station) snapshot at creation time, so later catalog edits
/// never touch historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Non-negative currency amount
    pub price: Decimal,
    /// Display grouping
    pub category: String,
    /// Preparation station this item is routed to
    pub station: Station,
    /// Soft-delete flag; inactive items cannot be ordered
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    /// The record id in "menu_item:id" string form
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}
