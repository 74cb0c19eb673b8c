//! Wire-visible domain enums
//!
//! Closed sets shared by the server and every terminal client. Roles and
//! stations are enums, not free-form strings: authorization and routing
//! decisions match on them exhaustively.

pub mod order;
pub mod role;
pub mod station;

pub use order::{OrderItemStatus, OrderStatus};
pub use role::Role;
pub use station::Station;
