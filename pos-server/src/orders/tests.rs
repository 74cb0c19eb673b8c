//! Order engine tests
//!
//! Run against an in-memory database with a real broadcaster subscriber,
//! so every assertion covers the same path production takes:
//! authorize -> validate -> persist -> broadcast.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::mpsc;

use shared::ErrorCode;
use shared::client::{
    CreateOrderRequest, MenuItemCreate, MenuItemUpdate, OrderFilter, OrderItemInput,
    UpdateOrderRequest,
};
use shared::message::PushEnvelope;
use shared::models::{OrderStatus, Role, Station};

use super::{OrderEngine, OrderSequence};
use crate::auth::CurrentUser;
use crate::db::DbService;
use crate::db::repository::MenuItemRepository;
use crate::ws::Broadcaster;

struct Harness {
    engine: OrderEngine,
    menu: MenuItemRepository,
    frames: mpsc::Receiver<String>,
    /// grill, 850
    burger: String,
    /// kitchen, 550
    salad: String,
    /// beverage, 250
    cola: String,
}

impl Harness {
    async fn new() -> Self {
        let db = DbService::memory().await.expect("in-memory db").db;
        let broadcaster = Arc::new(Broadcaster::new());
        let (_, frames) = broadcaster.subscribe();
        let sequence = Arc::new(OrderSequence::in_memory());
        let engine = OrderEngine::new(
            db.clone(),
            sequence,
            broadcaster,
            chrono_tz::Europe::Madrid,
        );

        let menu = MenuItemRepository::new(db);
        let burger = menu
            .create(MenuItemCreate {
                name: "Char-grilled burger".to_string(),
                price: Decimal::from(850),
                category: "Mains".to_string(),
                station: Station::Grill,
            })
            .await
            .unwrap()
            .id_string();
        let salad = menu
            .create(MenuItemCreate {
                name: "House salad".to_string(),
                price: Decimal::from(550),
                category: "Starters".to_string(),
                station: Station::Kitchen,
            })
            .await
            .unwrap()
            .id_string();
        let cola = menu
            .create(MenuItemCreate {
                name: "Cola".to_string(),
                price: Decimal::from(250),
                category: "Drinks".to_string(),
                station: Station::Beverage,
            })
            .await
            .unwrap()
            .id_string();

        Self {
            engine,
            menu,
            frames,
            burger,
            salad,
            cola,
        }
    }

    fn next_frame(&mut self) -> PushEnvelope {
        let frame = self.frames.try_recv().expect("expected a broadcast frame");
        serde_json::from_str(&frame).expect("frame should be a push envelope")
    }

    fn drain_frames(&mut self) {
        while self.frames.try_recv().is_ok() {}
    }

    fn no_frame(&mut self) {
        assert!(
            self.frames.try_recv().is_err(),
            "expected no broadcast frame"
        );
    }
}

fn actor(name: &str, role: Role) -> CurrentUser {
    CurrentUser {
        id: format!("user:{name}"),
        username: name.to_string(),
        display_name: name.to_string(),
        role,
    }
}

fn server(name: &str) -> CurrentUser {
    actor(name, Role::Server)
}

fn line(menu_item_id: &str, quantity: u32) -> OrderItemInput {
    OrderItemInput {
        menu_item_id: menu_item_id.to_string(),
        quantity,
        notes: None,
    }
}

fn request(items: Vec<OrderItemInput>) -> CreateOrderRequest {
    CreateOrderRequest {
        items,
        table_number: Some("4".to_string()),
    }
}

/// Creation timestamps order the queues; keep them distinct
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

// ========================================================================
// Creation: pricing, numbering, validation
// ========================================================================

#[tokio::test]
async fn test_create_prices_snapshots_and_broadcasts() {
    let mut h = Harness::new().await;
    let maria = server("maria");

    let order = h
        .engine
        .create_order(
            &maria,
            request(vec![line(&h.burger, 2), line(&h.salad, 1)]),
        )
        .await
        .unwrap();

    assert_eq!(order.total_price, Decimal::from(2250));
    assert_eq!(order.status, OrderStatus::Open);
    assert_eq!(order.order_number, 1);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.server_id, maria.id);
    assert_eq!(order.server_name, "maria");
    assert_eq!(order.table_number.as_deref(), Some("4"));

    let grill_item = order
        .items
        .iter()
        .find(|i| i.station == Station::Grill)
        .unwrap();
    assert_eq!(grill_item.name, "Char-grilled burger");
    assert_eq!(grill_item.price, Decimal::from(850));
    assert_eq!(grill_item.quantity, 2);

    let envelope = h.next_frame();
    assert_eq!(envelope.event_type, "order:new");
    assert_eq!(envelope.data["totalPrice"], "2250");
    assert_eq!(envelope.data["status"], "OPEN");
    assert_eq!(envelope.data["orderNumber"], 1);
}

#[tokio::test]
async fn test_order_numbers_increment_within_day() {
    let h = Harness::new().await;
    let maria = server("maria");

    let first = h
        .engine
        .create_order(&maria, request(vec![line(&h.cola, 1)]))
        .await
        .unwrap();
    let second = h
        .engine
        .create_order(&maria, request(vec![line(&h.cola, 1)]))
        .await
        .unwrap();

    assert_eq!(first.order_number, 1);
    assert_eq!(second.order_number, 2);
}

#[tokio::test]
async fn test_create_rejects_empty_items() {
    let mut h = Harness::new().await;
    let maria = server("maria");

    let err = h
        .engine
        .create_order(&maria, request(vec![]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderEmpty);

    // No persistence, no broadcast
    h.no_frame();
    let orders = h
        .engine
        .list_orders(&maria, &OrderFilter::default())
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_create_rejects_unknown_menu_items() {
    let mut h = Harness::new().await;
    let maria = server("maria");

    let err = h
        .engine
        .create_order(
            &maria,
            request(vec![line(&h.burger, 1), line("menu_item:nope", 1)]),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationFailed);
    let details = err.details.expect("missing ids should be listed");
    assert_eq!(
        details["missingIds"],
        serde_json::json!(["menu_item:nope"])
    );

    h.no_frame();
    let orders = h
        .engine
        .list_orders(&maria, &OrderFilter::default())
        .await
        .unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_create_rejects_zero_quantity() {
    let mut h = Harness::new().await;
    let maria = server("maria");

    let err = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 0)]))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidQuantity);
    h.no_frame();
}

#[tokio::test]
async fn test_create_rejects_inactive_menu_item() {
    let h = Harness::new().await;
    let maria = server("maria");

    h.menu.delete(&h.cola).await.unwrap();

    let err = h
        .engine
        .create_order(&maria, request(vec![line(&h.cola, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn test_price_snapshot_survives_menu_edit() {
    let h = Harness::new().await;
    let maria = server("maria");

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();

    h.menu
        .update(
            &h.burger,
            MenuItemUpdate {
                price: Some(Decimal::from(999)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let fetched = h
        .engine
        .get_order(&maria, &order.id_string())
        .await
        .unwrap();
    assert_eq!(fetched.items[0].price, Decimal::from(850));
    assert_eq!(fetched.total_price, Decimal::from(850));
}

// ========================================================================
// Update: bulk replacement, state gating
// ========================================================================

#[tokio::test]
async fn test_update_replaces_items_and_reprices() {
    let mut h = Harness::new().await;
    let maria = server("maria");

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.drain_frames();

    let updated = h
        .engine
        .update_order(
            &maria,
            &order.id_string(),
            UpdateOrderRequest {
                items: Some(vec![line(&h.salad, 2)]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].station, Station::Kitchen);
    assert_eq!(updated.total_price, Decimal::from(1100));

    let envelope = h.next_frame();
    assert_eq!(envelope.event_type, "order:update");
    assert_eq!(envelope.data["totalPrice"], "1100");
}

#[tokio::test]
async fn test_update_rejects_non_open_order() {
    let h = Harness::new().await;
    let maria = server("maria");

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.engine
        .mark_done(&maria, &order.id_string())
        .await
        .unwrap();

    let err = h
        .engine
        .update_order(
            &maria,
            &order.id_string(),
            UpdateOrderRequest {
                table_number: Some("9".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderState);
}

#[tokio::test]
async fn test_update_can_transition_status() {
    let h = Harness::new().await;
    let maria = server("maria");

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();

    let updated = h
        .engine
        .update_order(
            &maria,
            &order.id_string(),
            UpdateOrderRequest {
                status: Some(OrderStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Cancelled);
}

// ========================================================================
// Status machine: served / done / checkout / cancel
// ========================================================================

#[tokio::test]
async fn test_mark_served_requires_ownership() {
    let mut h = Harness::new().await;
    let maria = server("maria");
    let carlos = server("carlos");

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.drain_frames();

    let err = h
        .engine
        .mark_served(&carlos, &order.id_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotOrderOwner);
    h.no_frame();

    // Status untouched
    let fetched = h
        .engine
        .get_order(&maria, &order.id_string())
        .await
        .unwrap();
    assert_eq!(fetched.status, OrderStatus::Open);
}

#[tokio::test]
async fn test_served_then_checkout_flow() {
    let mut h = Harness::new().await;
    let maria = server("maria");
    let cashier = actor("ana", Role::Cashier);

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.drain_frames();

    let served = h
        .engine
        .mark_served(&maria, &order.id_string())
        .await
        .unwrap();
    assert_eq!(served.status, OrderStatus::Served);
    assert_eq!(h.next_frame().event_type, "order:served");

    let completed = h
        .engine
        .checkout(&cashier, &order.id_string())
        .await
        .unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(h.next_frame().event_type, "order:completed");
}

#[tokio::test]
async fn test_checkout_straight_from_open() {
    let h = Harness::new().await;
    let maria = server("maria");
    let owner = actor("boss", Role::Owner);

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.salad, 1)]))
        .await
        .unwrap();

    let completed = h.engine.checkout(&owner, &order.id_string()).await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
}

#[tokio::test]
async fn test_checkout_rejects_terminal_states() {
    let h = Harness::new().await;
    let maria = server("maria");
    let cashier = actor("ana", Role::Cashier);

    // DONE
    let done = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.engine.mark_done(&maria, &done.id_string()).await.unwrap();
    let err = h
        .engine
        .checkout(&cashier, &done.id_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderState);

    // CANCELLED
    let cancelled = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.engine.cancel_last_order(&maria).await.unwrap();
    let err = h
        .engine
        .checkout(&cashier, &cancelled.id_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderState);

    // COMPLETED (checkout twice)
    let completed = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.engine
        .checkout(&cashier, &completed.id_string())
        .await
        .unwrap();
    let err = h
        .engine
        .checkout(&cashier, &completed.id_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderState);
}

#[tokio::test]
async fn test_mark_done_only_from_open() {
    let h = Harness::new().await;
    let maria = server("maria");

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.engine
        .mark_served(&maria, &order.id_string())
        .await
        .unwrap();

    let err = h
        .engine
        .mark_done(&maria, &order.id_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderState);
}

#[tokio::test]
async fn test_cancel_last_picks_newest_open() {
    let mut h = Harness::new().await;
    let maria = server("maria");

    let first = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    tick().await;
    let second = h
        .engine
        .create_order(&maria, request(vec![line(&h.salad, 1)]))
        .await
        .unwrap();
    h.drain_frames();

    let cancelled = h.engine.cancel_last_order(&maria).await.unwrap();
    assert_eq!(cancelled.id_string(), second.id_string());
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(h.next_frame().event_type, "order:cancel");

    // The older order is untouched, and cancelled orders stay fetchable
    let fetched = h.engine.get_order(&maria, &first.id_string()).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Open);
}

#[tokio::test]
async fn test_cancel_last_without_open_orders() {
    let mut h = Harness::new().await;
    let maria = server("maria");
    let carlos = server("carlos");

    // Carlos' open order must not be cancellable by Maria
    h.engine
        .create_order(&carlos, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.drain_frames();

    let err = h.engine.cancel_last_order(&maria).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
    h.no_frame();
}

#[tokio::test]
async fn test_delete_removes_order_and_items() {
    let mut h = Harness::new().await;
    let maria = server("maria");

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    let order_id = order.id_string();
    h.drain_frames();

    h.engine.delete_order(&maria, &order_id).await.unwrap();

    let envelope = h.next_frame();
    assert_eq!(envelope.event_type, "order:delete");
    assert_eq!(envelope.data["id"], order_id);

    let err = h.engine.get_order(&maria, &order_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let h = Harness::new().await;
    let maria = server("maria");
    let carlos = server("carlos");

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();

    let err = h
        .engine
        .delete_order(&carlos, &order.id_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotOrderOwner);
}

// ========================================================================
// Station and cashier views
// ========================================================================

#[tokio::test]
async fn test_station_view_filters_orders_and_items() {
    let h = Harness::new().await;
    let maria = server("maria");
    let cook = actor("pepe", Role::GrillCook);
    let chef = actor("lucia", Role::KitchenStaff);

    // Mixed order: one grill item, one kitchen item, one beverage
    let mixed = h
        .engine
        .create_order(
            &maria,
            request(vec![line(&h.burger, 2), line(&h.salad, 1), line(&h.cola, 3)]),
        )
        .await
        .unwrap();
    tick().await;
    // Kitchen-only order
    h.engine
        .create_order(&maria, request(vec![line(&h.salad, 2)]))
        .await
        .unwrap();

    let grill_queue = h.engine.list_by_station(&cook, Station::Grill).await.unwrap();
    assert_eq!(grill_queue.len(), 1);
    assert_eq!(grill_queue[0].id_string(), mixed.id_string());
    // Abbreviated ticket: only the grill items survive the filter
    assert_eq!(grill_queue[0].items.len(), 1);
    assert_eq!(grill_queue[0].items[0].station, Station::Grill);

    let kitchen_queue = h.engine.list_by_station(&chef, Station::Kitchen).await.unwrap();
    assert_eq!(kitchen_queue.len(), 2);
    for ticket in &kitchen_queue {
        assert!(ticket.items.iter().all(|i| i.station == Station::Kitchen));
    }
}

#[tokio::test]
async fn test_station_view_is_fifo() {
    let h = Harness::new().await;
    let maria = server("maria");
    let cook = actor("pepe", Role::GrillCook);

    let first = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    tick().await;
    let second = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();

    let queue = h.engine.list_by_station(&cook, Station::Grill).await.unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].id_string(), first.id_string());
    assert_eq!(queue[1].id_string(), second.id_string());
}

#[tokio::test]
async fn test_station_view_role_enforced() {
    let h = Harness::new().await;
    let maria = server("maria");
    let cook = actor("pepe", Role::GrillCook);

    let err = h
        .engine
        .list_by_station(&maria, Station::Grill)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let err = h
        .engine
        .list_by_station(&cook, Station::Kitchen)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_cashier_view_statuses_and_order() {
    let h = Harness::new().await;
    let maria = server("maria");
    let cashier = actor("ana", Role::Cashier);

    let open = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    tick().await;
    let served = h
        .engine
        .create_order(&maria, request(vec![line(&h.salad, 1)]))
        .await
        .unwrap();
    h.engine
        .mark_served(&maria, &served.id_string())
        .await
        .unwrap();
    tick().await;
    let gone = h
        .engine
        .create_order(&maria, request(vec![line(&h.cola, 1)]))
        .await
        .unwrap();
    h.engine.checkout(&cashier, &gone.id_string()).await.unwrap();

    let queue = h.engine.list_for_cashier(&cashier).await.unwrap();
    assert_eq!(queue.len(), 2);
    // Oldest first
    assert_eq!(queue[0].id_string(), open.id_string());
    assert_eq!(queue[1].id_string(), served.id_string());

    // Servers have no cashier view
    let err = h.engine.list_for_cashier(&maria).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_list_orders_filters() {
    let h = Harness::new().await;
    let maria = server("maria");
    let carlos = server("carlos");

    h.engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    tick().await;
    let carlos_order = h
        .engine
        .create_order(&carlos, request(vec![line(&h.salad, 1)]))
        .await
        .unwrap();
    h.engine.cancel_last_order(&carlos).await.unwrap();

    let all = h
        .engine
        .list_orders(&maria, &OrderFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // Newest first
    assert_eq!(all[0].id_string(), carlos_order.id_string());

    let cancelled = h
        .engine
        .list_orders(
            &maria,
            &OrderFilter {
                status: Some(OrderStatus::Cancelled),
                server_id: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);

    let by_server = h
        .engine
        .list_orders(
            &maria,
            &OrderFilter {
                status: None,
                server_id: Some(carlos.id.clone()),
            },
        )
        .await
        .unwrap();
    assert_eq!(by_server.len(), 1);
    assert_eq!(by_server[0].server_id, carlos.id);
}

#[tokio::test]
async fn test_list_active_is_own_open_orders() {
    let h = Harness::new().await;
    let maria = server("maria");
    let carlos = server("carlos");

    let own = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    h.engine
        .create_order(&carlos, request(vec![line(&h.salad, 1)]))
        .await
        .unwrap();

    let active = h.engine.list_active(&maria).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id_string(), own.id_string());
}

// ========================================================================
// Station clears
// ========================================================================

#[tokio::test]
async fn test_clear_grill_bulk_completes() {
    let mut h = Harness::new().await;
    let maria = server("maria");
    let cook = actor("pepe", Role::GrillCook);

    let grill_order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    tick().await;
    let mixed = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1), line(&h.salad, 1)]))
        .await
        .unwrap();
    tick().await;
    let kitchen_only = h
        .engine
        .create_order(&maria, request(vec![line(&h.salad, 1)]))
        .await
        .unwrap();
    h.drain_frames();

    let affected = h.engine.clear_station(&cook, Station::Grill).await.unwrap();
    assert_eq!(affected, 2);

    let envelope = h.next_frame();
    assert_eq!(envelope.event_type, "grill:clear");
    assert_eq!(envelope.data["affected"], 2);

    // Grill-touching orders are completed, the kitchen-only one is not
    for id in [grill_order.id_string(), mixed.id_string()] {
        let order = h.engine.get_order(&maria, &id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }
    let untouched = h
        .engine
        .get_order(&maria, &kitchen_only.id_string())
        .await
        .unwrap();
    assert_eq!(untouched.status, OrderStatus::Open);
}

#[tokio::test]
async fn test_clear_kitchen_is_broadcast_only() {
    let mut h = Harness::new().await;
    let maria = server("maria");
    let chef = actor("lucia", Role::KitchenStaff);

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.salad, 1)]))
        .await
        .unwrap();
    h.drain_frames();

    let affected = h
        .engine
        .clear_station(&chef, Station::Kitchen)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let envelope = h.next_frame();
    assert_eq!(envelope.event_type, "kitchen:clear");
    assert_eq!(envelope.data["affected"], 1);

    // No persisted change: the order is still open
    let fetched = h.engine.get_order(&maria, &order.id_string()).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Open);
}

#[tokio::test]
async fn test_clear_station_role_enforced() {
    let h = Harness::new().await;
    let chef = actor("lucia", Role::KitchenStaff);

    let err = h
        .engine
        .clear_station(&chef, Station::Grill)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}

// ========================================================================
// Role policy on commands
// ========================================================================

#[tokio::test]
async fn test_role_policy_on_commands() {
    let mut h = Harness::new().await;
    let cashier = actor("ana", Role::Cashier);
    let maria = server("maria");

    let err = h
        .engine
        .create_order(&cashier, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    h.no_frame();

    let order = h
        .engine
        .create_order(&maria, request(vec![line(&h.burger, 1)]))
        .await
        .unwrap();
    let err = h
        .engine
        .checkout(&maria, &order.id_string())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}
