//! JWT extractor
//!
//! Validates the bearer token and re-fetches the user row on every
//! request, so deactivating an account takes effect immediately even for
//! tokens that are still formally valid.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::ErrorCode;

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::security_log;

/// Pull the token out of `Authorization: Bearer <token>` or, failing
/// that, a `?token=` query parameter (WebSocket clients cannot set
/// headers from a browser).
fn extract_token(parts: &Parts) -> Option<&str> {
    if let Some(header) = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        return JwtService::extract_from_header(header);
    }

    parts
        .uri
        .query()
        .and_then(|q| q.split('&').find_map(|kv| kv.strip_prefix("token=")))
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already extracted earlier in this request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = match extract_token(parts) {
            Some(token) => token,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::unauthorized());
            }
        };

        let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", parts.uri)
            );
            match e {
                crate::auth::JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        // Re-fetch the user: the stored row is authoritative for
        // is_active and role, the token only identifies the subject.
        let repo = UserRepository::new(state.get_db());
        let user = repo
            .find_by_id(&claims.sub)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(AppError::unauthorized)?;

        if !user.is_active {
            security_log!(
                "WARN",
                "auth_disabled_account",
                user_id = claims.sub.clone(),
                username = user.username.clone()
            );
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }

        let current = CurrentUser {
            id: claims.sub,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
        };

        parts.extensions.insert(current.clone());

        Ok(current)
    }
}
