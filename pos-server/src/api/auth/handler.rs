//! Authentication handlers

use std::time::Duration;

use axum::{Json, extract::State};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;
use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::response::ApiResponse;

/// Fixed delay for authentication to blunt timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Authenticates credentials and returns a JWT. Unknown usernames and
/// wrong passwords produce the same error to prevent enumeration.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_username(&req.username)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) => {
            if !user.is_active {
                security_log!(
                    "WARN",
                    "login_disabled_account",
                    username = req.username.clone()
                );
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = user
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    username = req.username.clone(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::invalid_credentials());
            }

            user
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = req.username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id_string();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    tracing::info!(username = %user.username, role = %user.role, "Login successful");

    Ok(ApiResponse::success(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
        },
    }))
}

/// GET /api/auth/me - the authenticated user's identity
pub async fn me(user: CurrentUser) -> ApiResponse<UserInfo> {
    ApiResponse::success(UserInfo {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        role: user.role,
    })
}
