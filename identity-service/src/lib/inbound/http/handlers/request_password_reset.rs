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

/// Begin a password reset for the account with the given email.
///
/// Responds with the same acknowledgement whether or not the email is
/// registered, so the endpoint cannot be used to probe for accounts.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<RequestPasswordResetBody>,
) -> Result<ApiSuccess<AckData>, ApiError> {
    match state
        .credential_service
        .request_password_reset(&body.email)
        .await
    {
        Ok(()) | Err(UserError::NotFound(_)) => Ok(ApiSuccess::new(StatusCode::OK, AckData::new())),
        Err(e) => Err(ApiError::from(e)),
    }
}

/// HTTP request body for starting a password reset (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequestPasswordResetBody {
    email: String,
}
