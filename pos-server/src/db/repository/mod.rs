//! Repository module
//!
//! CRUD access to the SurrealDB tables. IDs travel as `"table:id"`
//! strings across the stack; `RecordId` is used at the database edge.

pub mod menu_item;
pub mod order;
pub mod user;

pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an id that may or may not carry its table prefix
/// ("menu_item:abc" and "abc" both resolve within `table`)
pub fn parse_record_id(table: &str, id: &str) -> Option<RecordId> {
    if id.contains(':') {
        let parsed: RecordId = id.parse().ok()?;
        (parsed.table() == table).then_some(parsed)
    } else {
        Some(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
