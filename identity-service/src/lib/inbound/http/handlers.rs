use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::user::errors::AccountError;
use crate::user::errors::UserError;

pub mod get_user;
pub mod login;
pub mod refresh_token;
pub mod request_password_reset;
pub mod reset_password;
pub mod signup;
pub mod update_user;
pub mod verify_email;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::CredentialsIncorrect => ApiError::Unauthorized(err.to_string()),
            UserError::Account(ref account_err) => match account_err {
                AccountError::WeakPassword { .. } => ApiError::UnprocessableEntity(err.to_string()),
                AccountError::PasswordMismatch | AccountError::OneTimePasswordIncorrect => {
                    ApiError::Unauthorized(err.to_string())
                }
                // Hashing failures indicate misconfiguration or corrupted
                // storage, never a bad request
                AccountError::Password(_) => ApiError::InternalServerError(err.to_string()),
            },
            UserError::InvalidName(_) | UserError::InvalidEmail(_) | UserError::InvalidUserId(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// User representation returned by every user-facing handler.
///
/// Credential internals (hash, tokens, one-time password) never leave the
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub pronouns: String,
    pub email: String,
    pub verified: bool,
    pub created_at: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            pronouns: user.pronouns.clone(),
            email: user.account.email().as_str().to_string(),
            verified: user.account.is_verified(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Acknowledgement body for operations with no data to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AckData {
    pub ok: bool,
}

impl AckData {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for AckData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::UserNameError;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                UserError::NotFound("missing".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                UserError::EmailAlreadyExists("taken@example.com".to_string()),
                StatusCode::CONFLICT,
            ),
            (UserError::CredentialsIncorrect, StatusCode::UNAUTHORIZED),
            (
                UserError::Account(AccountError::WeakPassword { min: 10, actual: 4 }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                UserError::Account(AccountError::PasswordMismatch),
                StatusCode::UNAUTHORIZED,
            ),
            (
                UserError::Account(AccountError::OneTimePasswordIncorrect),
                StatusCode::UNAUTHORIZED,
            ),
            (
                UserError::InvalidName(UserNameError::TooShort { min: 2, actual: 1 }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                UserError::DatabaseError("connection lost".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let status = match ApiError::from(err) {
                ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::Conflict(_) => StatusCode::CONFLICT,
                ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            };
            assert_eq!(status, expected);
        }
    }
}
