//! Menu catalog handlers
//!
//! Reads are open to every authenticated role (terminals need the
//! catalog); writes belong to the owner.

use axum::extract::{Path, State};
use axum::Json;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::MenuItem;
use crate::db::repository::{MenuItemRepository, RepoError};
use crate::utils::{AppError, AppResult};
use shared::ErrorCode;
use shared::client::{MenuItemCreate, MenuItemUpdate};
use shared::models::Role;
use shared::response::ApiResponse;

fn require_owner(user: &CurrentUser) -> AppResult<()> {
    if user.role == Role::Owner {
        Ok(())
    } else {
        Err(AppError::forbidden("Menu management requires the owner role"))
    }
}

fn map_repo_err(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::MenuItemNotFound, msg),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::MenuItemNameExists, msg),
        RepoError::Validation(msg) => AppError::with_message(ErrorCode::MenuItemInvalidPrice, msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}

/// GET /api/menu-items - active catalog entries
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<ApiResponse<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    let items = repo.find_all().await.map_err(map_repo_err)?;
    Ok(ApiResponse::success(items))
}

/// GET /api/menu-items/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MenuItem>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo
        .find_by_id(&id)
        .await
        .map_err(map_repo_err)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::MenuItemNotFound,
                format!("Menu item {} not found", id),
            )
        })?;
    Ok(ApiResponse::success(item))
}

/// POST /api/menu-items - create a catalog entry (owner)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<ApiResponse<MenuItem>> {
    require_owner(&user)?;

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.create(payload).await.map_err(map_repo_err)?;

    tracing::info!(menu_item = %item.id_string(), name = %item.name, "Menu item created");
    Ok(ApiResponse::success(item))
}

/// PATCH /api/menu-items/{id} - update a catalog entry (owner)
///
/// Price edits never touch existing orders; each order item keeps the
/// snapshot taken when it was created.
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<ApiResponse<MenuItem>> {
    require_owner(&user)?;

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.update(&id, payload).await.map_err(map_repo_err)?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/menu-items/{id} - soft-delete a catalog entry (owner)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<bool>> {
    require_owner(&user)?;

    let repo = MenuItemRepository::new(state.get_db());
    let deleted = repo.delete(&id).await.map_err(map_repo_err)?;

    if !deleted {
        return Err(AppError::with_message(
            ErrorCode::MenuItemNotFound,
            format!("Menu item {} not found", id),
        ));
    }

    Ok(ApiResponse::success(true))
}
