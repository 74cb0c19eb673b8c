//! Order repository
//!
//! Orders embed their items, so a record is always a complete check:
//! creation, item replacement and deletion are single record operations.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::Order;
use serde::Serialize;
use shared::client::OrderFilter;
use shared::models::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order (items included)
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find one order by id (with or without the table prefix)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(None);
        };
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// List orders, optionally filtered by status and/or owning server,
    /// newest first
    pub async fn find_filtered(&self, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
        let mut sql = String::from("SELECT * FROM order");
        let mut conditions: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.server_id.is_some() {
            conditions.push("serverId = $server_id");
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY createdAt DESC");

        let mut query = self.base.db().query(sql.as_str());
        if let Some(status) = filter.status {
            query = query.bind(("status", status));
        }
        if let Some(server_id) = filter.server_id.clone() {
            query = query.bind(("server_id", server_id));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }

    /// All orders in `status`, oldest first (FIFO ticket order)
    pub async fn find_by_status_fifo(&self, status: OrderStatus) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE status = $status ORDER BY createdAt ASC")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders awaiting checkout (OPEN or SERVED), oldest first
    pub async fn find_for_cashier(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE status IN [$open, $served] ORDER BY createdAt ASC",
            )
            .bind(("open", OrderStatus::Open))
            .bind(("served", OrderStatus::Served))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// A server's own OPEN orders, newest first
    pub async fn find_open_by_server(&self, server_id: &str) -> RepoResult<Vec<Order>> {
        let server_id = server_id.to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE status = $status AND serverId = $server_id \
                 ORDER BY createdAt DESC",
            )
            .bind(("status", OrderStatus::Open))
            .bind(("server_id", server_id))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// The most recently created OPEN order owned by `server_id`
    pub async fn find_last_open_by_server(&self, server_id: &str) -> RepoResult<Option<Order>> {
        let server_id = server_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE status = $status AND serverId = $server_id \
                 ORDER BY createdAt DESC LIMIT 1",
            )
            .bind(("status", OrderStatus::Open))
            .bind(("server_id", server_id))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Replace the whole record (atomic item replacement + re-price)
    pub async fn replace(&self, order: Order) -> RepoResult<Order> {
        let record_id = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Order has no id".to_string()))?;

        let content = Order { id: None, ..order };

        let updated: Option<Order> = self.base.db().update(record_id.clone()).content(content).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", record_id)))
    }

    /// Transition a single order's status
    pub async fn set_status(
        &self,
        id: &str,
        status: OrderStatus,
        updated_at: i64,
    ) -> RepoResult<Order> {
        let record_id = parse_record_id(TABLE, id)
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct StatusPatch {
            status: OrderStatus,
            updated_at: i64,
        }

        let updated: Option<Order> = self
            .base
            .db()
            .update(record_id)
            .merge(StatusPatch { status, updated_at })
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard-delete an order; the embedded items go with the record
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(false);
        };
        let deleted: Option<Order> = self.base.db().delete(record_id).await?;
        Ok(deleted.is_some())
    }
}
