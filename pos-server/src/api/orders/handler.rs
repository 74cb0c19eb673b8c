//! Order API handlers
//!
//! Thin translation layer: extract the actor and the payload, call the
//! engine, wrap the result. Authorization and state rules live in the
//! engine, not here.

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::utils::AppResult;
use shared::client::{CreateOrderRequest, OrderFilter, UpdateOrderRequest};
use shared::message::StationClearPayload;
use shared::models::Station;
use shared::response::ApiResponse;

/// POST /api/orders - create an order (SERVER), 201 with the hydrated order
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let order = state.order_engine().create_order(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

/// GET /api/orders?status=&serverId= - list orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(filter): Query<OrderFilter>,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = state.order_engine().list_orders(&user, &filter).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/active - the actor's own OPEN orders (SERVER)
pub async fn list_active(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = state.order_engine().list_active(&user).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/grill - grill ticket queue (GRILL_COOK, OWNER)
pub async fn list_grill(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = state
        .order_engine()
        .list_by_station(&user, Station::Grill)
        .await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/kitchen - kitchen ticket queue (KITCHEN_STAFF, OWNER)
pub async fn list_kitchen(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = state
        .order_engine()
        .list_by_station(&user, Station::Kitchen)
        .await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/cashier - OPEN and SERVED orders (CASHIER, OWNER)
pub async fn list_cashier(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<Order>>> {
    let orders = state.order_engine().list_for_cashier(&user).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.order_engine().get_order(&user, &id).await?;
    Ok(ApiResponse::success(order))
}

/// PATCH /api/orders/{id} - update an OPEN order (SERVER)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.order_engine().update_order(&user, &id, payload).await?;
    Ok(ApiResponse::success(order))
}

/// PATCH /api/orders/{id}/served - OPEN -> SERVED (owning SERVER)
pub async fn mark_served(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.order_engine().mark_served(&user, &id).await?;
    Ok(ApiResponse::success(order))
}

/// PATCH /api/orders/{id}/done - OPEN -> DONE (owning SERVER)
pub async fn mark_done(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.order_engine().mark_done(&user, &id).await?;
    Ok(ApiResponse::success(order))
}

/// PATCH /api/orders/{id}/checkout - OPEN/SERVED -> COMPLETED (CASHIER, OWNER)
pub async fn checkout(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let order = state.order_engine().checkout(&user, &id).await?;
    Ok(ApiResponse::success(order))
}

/// DELETE /api/orders/{id} - hard delete (owning SERVER)
pub async fn delete_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.order_engine().delete_order(&user, &id).await?;
    Ok(ApiResponse::success_with_message("Order deleted", ()))
}

/// DELETE /api/orders/last - cancel the actor's newest OPEN order (SERVER)
pub async fn cancel_last(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Order>> {
    let order = state.order_engine().cancel_last_order(&user).await?;
    Ok(ApiResponse::success(order))
}

/// DELETE /api/orders/grill - bulk-complete the grill queue (GRILL_COOK, OWNER)
pub async fn clear_grill(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<StationClearPayload>> {
    let affected = state
        .order_engine()
        .clear_station(&user, Station::Grill)
        .await?;
    Ok(ApiResponse::success(StationClearPayload {
        station: Station::Grill,
        affected,
    }))
}

/// DELETE /api/orders/kitchen - broadcast-only clear signal (KITCHEN_STAFF, OWNER)
pub async fn clear_kitchen(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<StationClearPayload>> {
    let affected = state
        .order_engine()
        .clear_station(&user, Station::Kitchen)
        .await?;
    Ok(ApiResponse::success(StationClearPayload {
        station: Station::Kitchen,
        affected,
    }))
}
