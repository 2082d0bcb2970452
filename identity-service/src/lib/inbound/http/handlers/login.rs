use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum::RequestExt;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Authenticate with email and password, returning the user and a fresh
/// access/refresh token pair.
pub async fn login(
    State(state): State<AppState>,
    req: Request,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let client_ip = client_ip(&req);
    let Json(body): Json<LoginRequestBody> = req
        .extract()
        .await
        .map_err(|_| ApiError::BadRequest("invalid request body".to_string()))?;

    let user = state
        .credential_service
        .login(&body.email, &body.password, &client_ip)
        .await
        .map_err(|e| match e {
            // Unknown email and wrong password answer identically,
            // so callers cannot probe which addresses have accounts
            UserError::NotFound(_) | UserError::CredentialsIncorrect => {
                ApiError::NotFound("no account found with that email and password".to_string())
            }
            _ => ApiError::from(e),
        })?;

    let tokens = state
        .authenticator
        .issue_token_pair(&user.id.to_string(), user.name.as_str())
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            user: (&user).into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        },
    ))
}

fn client_ip(req: &Request) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub user: UserData,
    pub access_token: String,
    pub refresh_token: String,
}
