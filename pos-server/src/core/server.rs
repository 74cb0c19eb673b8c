//! Server implementation
//!
//! Router assembly and HTTP server lifecycle.

use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};
use crate::ws;

/// HTTP server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Assemble the application router
    pub fn build_router(state: ServerState) -> Router {
        Router::new()
            // Public
            .route("/api/health", get(api::health::handler::health))
            .route("/api/auth/login", post(api::auth::handler::login))
            // Session
            .route("/api/auth/me", get(api::auth::handler::me))
            // Push channel
            .route("/api/ws", get(ws::handler::ws_upgrade))
            // Menu catalog
            .route(
                "/api/menu-items",
                get(api::menu_items::handler::list).post(api::menu_items::handler::create),
            )
            .route(
                "/api/menu-items/{id}",
                get(api::menu_items::handler::get_by_id)
                    .patch(api::menu_items::handler::update)
                    .delete(api::menu_items::handler::delete),
            )
            // Users
            .route(
                "/api/users",
                get(api::users::handler::list).post(api::users::handler::create),
            )
            // Orders
            .route(
                "/api/orders",
                post(api::orders::handler::create).get(api::orders::handler::list),
            )
            .route("/api/orders/active", get(api::orders::handler::list_active))
            .route(
                "/api/orders/grill",
                get(api::orders::handler::list_grill).delete(api::orders::handler::clear_grill),
            )
            .route(
                "/api/orders/kitchen",
                get(api::orders::handler::list_kitchen).delete(api::orders::handler::clear_kitchen),
            )
            .route(
                "/api/orders/cashier",
                get(api::orders::handler::list_cashier),
            )
            .route("/api/orders/last", delete(api::orders::handler::cancel_last))
            .route(
                "/api/orders/{id}",
                get(api::orders::handler::get_by_id)
                    .patch(api::orders::handler::update)
                    .delete(api::orders::handler::delete_order),
            )
            .route(
                "/api/orders/{id}/served",
                patch(api::orders::handler::mark_served),
            )
            .route(
                "/api/orders/{id}/done",
                patch(api::orders::handler::mark_done),
            )
            .route(
                "/api/orders/{id}/checkout",
                patch(api::orders::handler::checkout),
            )
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        let router = Self::build_router(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("POS server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await?;

        Ok(())
    }
}
