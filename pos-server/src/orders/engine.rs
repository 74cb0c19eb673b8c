//! Order engine - command side of the order lifecycle
//!
//! Every operation follows the same shape:
//!
//! ```text
//! operation(actor, ...)
//!     ├─ 1. authorize (role policy, ownership)
//!     ├─ 2. validate (catalog resolution, quantities, status machine)
//!     ├─ 3. persist (single record operation)
//!     └─ 4. broadcast (best-effort, after the commit)
//! ```
//!
//! Broadcast failures never fail the mutation that already committed;
//! the push channel is fire-and-forget and clients reconcile by
//! refetching.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::ErrorCode;
use shared::client::{CreateOrderRequest, OrderFilter, OrderItemInput, UpdateOrderRequest};
use shared::message::OrderEventKind;
use shared::models::{OrderStatus, Station};
use shared::util::now_millis;

use crate::auth::CurrentUser;
use crate::auth::policy::{self, OrderAction};
use crate::db::models::{MenuItem, Order, OrderItem};
use crate::db::repository::{MenuItemRepository, OrderRepository, RepoError, parse_record_id};
use crate::security_log;
use crate::utils::{AppError, AppResult};
use crate::ws::Broadcaster;

/// What a station clear does to persisted state
///
/// Both observed behaviors exist in the field: the grill display archives
/// its queue by completing the orders, the kitchen display only blanks
/// the screens and leaves order state to the cashier flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// Bulk-complete every open order touching the station
    Persisted,
    /// Emit the clear signal only; no state change
    BroadcastOnly,
}

impl ClearMode {
    pub fn for_station(station: Station) -> Self {
        match station {
            Station::Grill => ClearMode::Persisted,
            Station::Kitchen | Station::Beverage => ClearMode::BroadcastOnly,
        }
    }
}

/// Order engine
///
/// Stateless apart from the injected collaborators; cheap to construct
/// per request from [`crate::core::ServerState`].
pub struct OrderEngine {
    orders: OrderRepository,
    menu: MenuItemRepository,
    sequence: Arc<super::OrderSequence>,
    broadcaster: Arc<Broadcaster>,
    tz: Tz,
}

impl OrderEngine {
    pub fn new(
        db: Surreal<Db>,
        sequence: Arc<super::OrderSequence>,
        broadcaster: Arc<Broadcaster>,
        tz: Tz,
    ) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            menu: MenuItemRepository::new(db),
            sequence,
            broadcaster,
            tz,
        }
    }

    // ==================== Commands ====================

    /// Create an order from item selections (role: SERVER)
    pub async fn create_order(
        &self,
        actor: &CurrentUser,
        req: CreateOrderRequest,
    ) -> AppResult<Order> {
        self.authorize(actor, OrderAction::Create)?;

        let items = self.build_items(&req.items).await?;
        let total_price = Order::compute_total(&items);
        let order_number = self.sequence.next(self.business_today());
        let now = now_millis();

        let order = Order {
            id: None,
            order_number,
            status: OrderStatus::Open,
            table_number: req.table_number,
            total_price,
            server_id: actor.id.clone(),
            server_name: actor.display_name.clone(),
            items,
            created_at: now,
            updated_at: now,
        };

        let created = self.orders.create(order).await.map_err(repo_err)?;

        tracing::info!(
            order = %created.id_string(),
            number = created.order_number,
            total = %created.total_price,
            server = %actor.username,
            "Order created"
        );

        self.broadcaster
            .broadcast_order(OrderEventKind::New, &created);
        Ok(created)
    }

    /// Update an OPEN order: bulk item replacement, table move, or an
    /// explicit status transition (role: SERVER)
    pub async fn update_order(
        &self,
        actor: &CurrentUser,
        id: &str,
        req: UpdateOrderRequest,
    ) -> AppResult<Order> {
        self.authorize(actor, OrderAction::Update)?;

        let mut order = self.fetch(id).await?;
        if order.status != OrderStatus::Open {
            return Err(AppError::invalid_state(format!(
                "Order {} is {}, only OPEN orders can be updated",
                order.order_number, order.status
            )));
        }

        if let Some(inputs) = &req.items {
            // Replace-all: the record update swaps the item list and the
            // new total in one write, so a crash can never leave a
            // half-replaced order behind.
            order.items = self.build_items(inputs).await?;
            order.total_price = Order::compute_total(&order.items);
        }

        if let Some(table_number) = req.table_number {
            order.table_number = Some(table_number);
        }

        if let Some(next) = req.status {
            ensure_transition(&order, next)?;
            order.status = next;
        }

        order.updated_at = now_millis();
        let updated = self.orders.replace(order).await.map_err(repo_err)?;

        self.broadcaster
            .broadcast_order(OrderEventKind::Update, &updated);
        Ok(updated)
    }

    /// Cancel the actor's most recently created OPEN order (role: SERVER)
    pub async fn cancel_last_order(&self, actor: &CurrentUser) -> AppResult<Order> {
        self.authorize(actor, OrderAction::CancelLast)?;

        let last = self
            .orders
            .find_last_open_by_server(&actor.id)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::OrderNotFound, "No open orders to cancel")
            })?;

        // Cancelled, not deleted: the ticket stays for the audit trail
        let cancelled = self
            .orders
            .set_status(&last.id_string(), OrderStatus::Cancelled, now_millis())
            .await
            .map_err(repo_err)?;

        tracing::info!(
            order = %cancelled.id_string(),
            number = cancelled.order_number,
            server = %actor.username,
            "Order cancelled"
        );

        self.broadcaster
            .broadcast_order(OrderEventKind::Cancel, &cancelled);
        Ok(cancelled)
    }

    /// OPEN -> SERVED (role: SERVER, own orders only)
    pub async fn mark_served(&self, actor: &CurrentUser, id: &str) -> AppResult<Order> {
        self.authorize(actor, OrderAction::MarkServed)?;
        let order = self.fetch(id).await?;
        self.ensure_owner(actor, &order)?;
        ensure_transition(&order, OrderStatus::Served)?;

        let served = self
            .orders
            .set_status(&order.id_string(), OrderStatus::Served, now_millis())
            .await
            .map_err(repo_err)?;

        self.broadcaster
            .broadcast_order(OrderEventKind::Served, &served);
        Ok(served)
    }

    /// OPEN -> DONE, the server-side terminal shortcut
    /// (role: SERVER, own orders only)
    pub async fn mark_done(&self, actor: &CurrentUser, id: &str) -> AppResult<Order> {
        self.authorize(actor, OrderAction::MarkDone)?;
        let order = self.fetch(id).await?;
        self.ensure_owner(actor, &order)?;
        ensure_transition(&order, OrderStatus::Done)?;

        let done = self
            .orders
            .set_status(&order.id_string(), OrderStatus::Done, now_millis())
            .await
            .map_err(repo_err)?;

        self.broadcaster.broadcast_order(OrderEventKind::Done, &done);
        Ok(done)
    }

    /// OPEN or SERVED -> COMPLETED (role: CASHIER or OWNER)
    pub async fn checkout(&self, actor: &CurrentUser, id: &str) -> AppResult<Order> {
        self.authorize(actor, OrderAction::Checkout)?;
        let order = self.fetch(id).await?;
        ensure_transition(&order, OrderStatus::Completed)?;

        let completed = self
            .orders
            .set_status(&order.id_string(), OrderStatus::Completed, now_millis())
            .await
            .map_err(repo_err)?;

        tracing::info!(
            order = %completed.id_string(),
            number = completed.order_number,
            total = %completed.total_price,
            cashier = %actor.username,
            "Order checked out"
        );

        self.broadcaster
            .broadcast_order(OrderEventKind::Completed, &completed);
        Ok(completed)
    }

    /// Hard-delete an order and its items (role: SERVER, own orders only)
    pub async fn delete_order(&self, actor: &CurrentUser, id: &str) -> AppResult<()> {
        self.authorize(actor, OrderAction::Delete)?;
        let order = self.fetch(id).await?;
        self.ensure_owner(actor, &order)?;

        let order_id = order.id_string();
        self.orders.delete(&order_id).await.map_err(repo_err)?;

        tracing::info!(order = %order_id, server = %actor.username, "Order deleted");

        self.broadcaster.broadcast_deleted(&order_id);
        Ok(())
    }

    /// Clear a station's ticket queue
    /// (role: matching station worker or OWNER)
    ///
    /// Grill clears persist (bulk-complete); kitchen clears are a
    /// broadcast-only signal. Returns the number of open orders touched.
    pub async fn clear_station(&self, actor: &CurrentUser, station: Station) -> AppResult<u64> {
        if !policy::can_clear_station(actor.role, station) {
            return Err(self.deny(actor, &format!("clear {station} station")));
        }

        let open = self
            .orders
            .find_by_status_fifo(OrderStatus::Open)
            .await
            .map_err(repo_err)?;
        let queue: Vec<&Order> = open.iter().filter(|o| o.touches_station(station)).collect();
        let affected = queue.len() as u64;

        if ClearMode::for_station(station) == ClearMode::Persisted {
            let now = now_millis();
            for order in &queue {
                self.orders
                    .set_status(&order.id_string(), OrderStatus::Completed, now)
                    .await
                    .map_err(repo_err)?;
            }
        }

        tracing::info!(%station, affected, "Station cleared");

        self.broadcaster.broadcast_clear(station, affected);
        Ok(affected)
    }

    // ==================== Queries ====================

    /// List orders, optionally filtered, newest first
    pub async fn list_orders(
        &self,
        actor: &CurrentUser,
        filter: &OrderFilter,
    ) -> AppResult<Vec<Order>> {
        self.authorize(actor, OrderAction::List)?;
        self.orders.find_filtered(filter).await.map_err(repo_err)
    }

    /// One order by id
    pub async fn get_order(&self, actor: &CurrentUser, id: &str) -> AppResult<Order> {
        self.authorize(actor, OrderAction::Get)?;
        self.fetch(id).await
    }

    /// The actor's own OPEN orders (role: SERVER)
    pub async fn list_active(&self, actor: &CurrentUser) -> AppResult<Vec<Order>> {
        self.authorize(actor, OrderAction::ListActive)?;
        self.orders
            .find_open_by_server(&actor.id)
            .await
            .map_err(repo_err)
    }

    /// A station's ticket queue: OPEN orders containing at least one item
    /// for `station`, item lists narrowed to that station, oldest first
    pub async fn list_by_station(
        &self,
        actor: &CurrentUser,
        station: Station,
    ) -> AppResult<Vec<Order>> {
        if !policy::can_view_station(actor.role, station) {
            return Err(self.deny(actor, &format!("view {station} station")));
        }

        let open = self
            .orders
            .find_by_status_fifo(OrderStatus::Open)
            .await
            .map_err(repo_err)?;

        Ok(open
            .iter()
            .filter(|o| o.touches_station(station))
            .map(|o| o.ticket_for(station))
            .collect())
    }

    /// Orders awaiting checkout (role: CASHIER or OWNER), oldest first
    pub async fn list_for_cashier(&self, actor: &CurrentUser) -> AppResult<Vec<Order>> {
        self.authorize(actor, OrderAction::ViewCashier)?;
        self.orders.find_for_cashier().await.map_err(repo_err)
    }

    // ==================== Internals ====================

    fn business_today(&self) -> chrono::NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    async fn fetch(&self, id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(repo_err)?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
            })
    }

    fn authorize(&self, actor: &CurrentUser, action: OrderAction) -> AppResult<()> {
        if policy::allows(actor.role, action) {
            Ok(())
        } else {
            Err(self.deny(actor, &format!("{:?}", action)))
        }
    }

    fn deny(&self, actor: &CurrentUser, operation: &str) -> AppError {
        security_log!(
            "WARN",
            "permission_denied",
            user_id = actor.id.clone(),
            role = actor.role.to_string(),
            operation = operation.to_string()
        );
        AppError::with_message(
            ErrorCode::PermissionDenied,
            format!("Role {} may not {}", actor.role, operation),
        )
    }

    fn ensure_owner(&self, actor: &CurrentUser, order: &Order) -> AppResult<()> {
        if order.server_id == actor.id {
            Ok(())
        } else {
            security_log!(
                "WARN",
                "not_order_owner",
                user_id = actor.id.clone(),
                order = order.id_string(),
                owner = order.server_id.clone()
            );
            Err(AppError::new(ErrorCode::NotOrderOwner))
        }
    }

    /// Validate item inputs against the catalog and snapshot them
    ///
    /// Runs before anything is persisted or numbered; a failure here
    /// leaves no trace.
    async fn build_items(&self, inputs: &[OrderItemInput]) -> AppResult<Vec<OrderItem>> {
        if inputs.is_empty() {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }

        if let Some(bad) = inputs.iter().find(|i| i.quantity == 0) {
            return Err(
                AppError::new(ErrorCode::InvalidQuantity)
                    .with_detail("menuItemId", bad.menu_item_id.clone()),
            );
        }

        let ids: Vec<String> = inputs.iter().map(|i| i.menu_item_id.clone()).collect();
        let found = self.menu.find_by_ids(&ids).await.map_err(repo_err)?;

        // Inactive entries resolve in the table but cannot be ordered;
        // they are reported exactly like unknown ids.
        let by_id: HashMap<String, MenuItem> = found
            .into_iter()
            .filter(|m| m.active)
            .map(|m| (m.id_string(), m))
            .collect();

        let mut items = Vec::with_capacity(inputs.len());
        let mut missing: Vec<String> = Vec::new();

        for input in inputs {
            let key = parse_record_id("menu_item", &input.menu_item_id)
                .map(|r| r.to_string())
                .unwrap_or_else(|| input.menu_item_id.clone());

            match by_id.get(&key) {
                Some(menu_item) => items.push(OrderItem {
                    id: uuid::Uuid::new_v4().to_string(),
                    menu_item_id: key,
                    name: menu_item.name.clone(),
                    station: menu_item.station,
                    price: menu_item.price,
                    quantity: input.quantity,
                    notes: input.notes.clone(),
                    status: Default::default(),
                }),
                None => missing.push(input.menu_item_id.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(AppError::validation("Unknown menu items")
                .with_detail("missingIds", serde_json::json!(missing)));
        }

        Ok(items)
    }
}

/// Status-machine gate shared by every transition
fn ensure_transition(order: &Order, next: OrderStatus) -> AppResult<()> {
    if order.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::invalid_state(format!(
            "Order {} is {}, cannot move to {}",
            order.order_number, order.status, next
        )))
    }
}

fn repo_err(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
        RepoError::Duplicate(msg) => AppError::conflict(msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}
