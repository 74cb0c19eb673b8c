use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::{OrderEngine, OrderSequence};
use crate::ws::Broadcaster;

/// Server state - shared handles to every service
///
/// Cloning is shallow (`Arc` and SurrealDB handles), so the state is
/// passed by value into axum. The broadcaster and the order sequence are
/// constructed exactly once here and handed to whoever publishes or
/// numbers orders; there is no module-level singleton state.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT authentication service
    pub jwt_service: Arc<JwtService>,
    /// Push-channel subscriber registry
    pub broadcaster: Arc<Broadcaster>,
    /// Daily order-number sequence
    pub sequence: Arc<OrderSequence>,
}

impl ServerState {
    /// Initialize server state
    ///
    /// 1. work directory structure
    /// 2. database (work_dir/database)
    /// 3. order-number sequence (work_dir/database/sequence.redb)
    /// 4. JWT service, broadcaster
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::new(&config.database_dir())
            .await
            .expect("Failed to initialize database");

        // Sequence degrades to an in-memory counter when the file is
        // unavailable; order creation keeps working either way.
        let sequence = Arc::new(OrderSequence::open(config.sequence_path()));

        Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service: Arc::new(JwtService::default()),
            broadcaster: Arc::new(Broadcaster::new()),
            sequence,
        }
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Build an order engine bound to this state
    pub fn order_engine(&self) -> OrderEngine {
        OrderEngine::new(
            self.db.clone(),
            self.sequence.clone(),
            self.broadcaster.clone(),
            self.config.timezone,
        )
    }
}
