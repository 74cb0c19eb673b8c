//! User management handlers (owner only)

use axum::Json;
use axum::extract::State;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::{RepoError, UserRepository};
use crate::utils::{AppError, AppResult};
use shared::ErrorCode;
use shared::client::UserCreate;
use shared::models::Role;
use shared::response::ApiResponse;

fn require_owner(user: &CurrentUser) -> AppResult<()> {
    if user.role == Role::Owner {
        Ok(())
    } else {
        Err(AppError::forbidden("User management requires the owner role"))
    }
}

fn map_repo_err(e: RepoError) -> AppError {
    match e {
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::UserNotFound, msg),
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::UsernameExists, msg),
        RepoError::Validation(msg) => AppError::validation(msg),
        RepoError::Database(msg) => AppError::database(msg),
    }
}

/// GET /api/users - all accounts, hashes excluded by the model
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<Vec<User>>> {
    require_owner(&user)?;

    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await.map_err(map_repo_err)?;
    Ok(ApiResponse::success(users))
}

/// POST /api/users - create an account; duplicate usernames conflict
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<UserCreate>,
) -> AppResult<ApiResponse<User>> {
    require_owner(&user)?;

    let repo = UserRepository::new(state.get_db());
    let created = repo.create(payload).await.map_err(map_repo_err)?;

    tracing::info!(
        user = %created.id_string(),
        username = %created.username,
        role = %created.role,
        "User created"
    );

    Ok(ApiResponse::success(created))
}
