use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::CredentialServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Update the profile and credentials of the currently authenticated user.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateUserRequestBody>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = body.try_into_command().map_err(UserError::from)?;

    state
        .credential_service
        .update_user(&auth.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::OK, UserData::from(&user)))
}

/// HTTP request body for a partial user update (raw JSON).
///
/// Absent or empty fields mean "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct UpdateUserRequestBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    new_password: Option<String>,
    #[serde(default)]
    old_password: Option<String>,
    #[serde(default)]
    pronouns: Option<String>,
}

impl UpdateUserRequestBody {
    /// Validate the provided fields and build an [`UpdateUserCommand`].
    ///
    /// Empty strings are normalized to `None` before validation so clients
    /// can send a sparse form without tripping length checks.
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        let name = match non_empty(self.name) {
            Some(name) => Some(UserName::new(name)?),
            None => None,
        };
        let email = match non_empty(self.email) {
            Some(email) => Some(EmailAddress::new(email)?),
            None => None,
        };

        Ok(UpdateUserCommand {
            name,
            email,
            new_password: non_empty(self.new_password),
            old_password: non_empty(self.old_password),
            pronouns: self.pronouns,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_strings_are_treated_as_absent() {
        let body = UpdateUserRequestBody {
            name: Some("".to_string()),
            email: Some("".to_string()),
            new_password: Some("".to_string()),
            old_password: Some("".to_string()),
            pronouns: None,
        };

        let command = body.try_into_command().unwrap();

        assert!(command.name.is_none());
        assert!(command.email.is_none());
        assert!(command.new_password.is_none());
        assert!(command.old_password.is_none());
        assert!(command.pronouns.is_none());
    }

    #[test]
    fn test_provided_fields_are_validated() {
        let body = UpdateUserRequestBody {
            name: Some("A".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            body.try_into_command(),
            Err(UserError::InvalidName(_))
        ));
    }

    #[test]
    fn test_valid_fields_pass_through() {
        let body = UpdateUserRequestBody {
            name: Some("Grace Hopper".to_string()),
            email: Some("grace@example.com".to_string()),
            pronouns: Some("she/her".to_string()),
            ..Default::default()
        };

        let command = body.try_into_command().unwrap();

        assert_eq!(command.name.unwrap().as_str(), "Grace Hopper");
        assert_eq!(command.email.unwrap().as_str(), "grace@example.com");
        assert_eq!(command.pronouns.as_deref(), Some("she/her"));
    }
}
