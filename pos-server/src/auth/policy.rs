//! Role × operation permission table
//!
//! Authorization is a single exhaustive match over the closed [`Role`]
//! enum and the order operations, checked once at the top of every engine
//! operation. Ownership checks (a server touching only its own orders)
//! live in the engine next to the fetched order.

use shared::models::{Role, Station};

/// Order engine operations subject to role checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Create,
    List,
    Get,
    ListActive,
    Update,
    CancelLast,
    MarkServed,
    MarkDone,
    Checkout,
    Delete,
    ViewCashier,
}

/// Whether `role` may perform `action`
pub fn allows(role: Role, action: OrderAction) -> bool {
    use OrderAction::*;
    match action {
        // Every authenticated actor may read the order list / a single order
        List | Get => true,

        // Order composition and the server-side lifecycle belong to servers
        Create | ListActive | Update | CancelLast | MarkServed | MarkDone | Delete => {
            role == Role::Server
        }

        // Checkout desk
        Checkout | ViewCashier => matches!(role, Role::Cashier | Role::Owner),
    }
}

/// Whether `role` may view the ticket queue of `station`
pub fn can_view_station(role: Role, station: Station) -> bool {
    role == Role::Owner || role.station() == Some(station)
}

/// Whether `role` may clear the ticket queue of `station`
pub fn can_clear_station(role: Role, station: Station) -> bool {
    // Same membership rule as viewing
    can_view_station(role, station)
}
