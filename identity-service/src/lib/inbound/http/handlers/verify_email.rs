use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::AckData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;

/// Mark the email behind a verification token as verified.
///
/// Verification links land here from an email client, often more than once,
/// so an unknown or already-used token still gets a friendly 200.
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<AckData>, ApiError> {
    state
        .credential_service
        .verify_email(&token)
        .await
        .map_err(ApiError::from)
        .map(|()| ApiSuccess::new(StatusCode::OK, AckData::new()))
}
