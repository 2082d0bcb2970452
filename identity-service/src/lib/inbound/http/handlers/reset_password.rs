use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::AckData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Complete a password reset by consuming a one-time password.
///
/// A stale or already-consumed one-time password is indistinguishable from a
/// wrong one; both come back as 401.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequestBody>,
) -> Result<ApiSuccess<AckData>, ApiError> {
    state
        .credential_service
        .reset_password(&body.one_time_password, &body.new_password)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                ApiError::Unauthorized("one-time-use password expired or invalid".to_string())
            }
            other => ApiError::from(other),
        })
        .map(|()| ApiSuccess::new(StatusCode::OK, AckData::new()))
}

/// HTTP request body for completing a password reset (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequestBody {
    one_time_password: String,
    new_password: String,
}
