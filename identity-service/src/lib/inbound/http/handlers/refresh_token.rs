use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

/// Trade a still-valid refresh token for a fresh access/refresh pair.
///
/// The user is re-resolved from the store so a deleted account cannot keep
/// refreshing. Every failure, including "user no longer exists", collapses
/// into the same 401.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequestBody>,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    let subject = state
        .authenticator
        .verify_refresh(&body.refresh_token)
        .map_err(|_| unauthorized())?;

    let user_id = UserId::from_string(&subject).map_err(|_| unauthorized())?;

    let user = state
        .credential_service
        .fetch_user(&user_id)
        .await
        .map_err(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "Refresh rejected");
            unauthorized()
        })?;

    let tokens = state
        .authenticator
        .issue_token_pair(&user.id.to_string(), user.name.as_str())
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshTokenResponseData {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        },
    ))
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("unauthorized".to_string())
}

/// HTTP request body for token refresh (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponseData {
    pub access_token: String,
    pub refresh_token: String,
}
