//! Database models
//!
//! Records as stored in SurrealDB. `RecordId` fields serialize to the
//! `"table:id"` string form on the wire.

pub mod menu_item;
pub mod order;
pub mod serde_helpers;
pub mod user;

pub use menu_item::MenuItem;
pub use order::{Order, OrderItem};
pub use user::User;
