use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::user::models::Account;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str = "id, name, pronouns, email, password_hash, verified, \
                            verification_token, one_time_password, created_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.find_one("email", email).await
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, UserError> {
        if token.is_empty() {
            // Verified accounts store an empty token; never match on it
            return Ok(None);
        }

        self.find_one("verification_token", token).await
    }

    async fn find_by_one_time_password(&self, otp: &str) -> Result<Option<User>, UserError> {
        if otp.is_empty() {
            return Ok(None);
        }

        self.find_one("one_time_password", otp).await
    }

    async fn save(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, pronouns, email, password_hash, verified,
                               verification_token, one_time_password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                pronouns = EXCLUDED.pronouns,
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                verified = EXCLUDED.verified,
                verification_token = EXCLUDED.verification_token,
                one_time_password = EXCLUDED.one_time_password,
                updated_at = NOW()
            "#,
        )
        .bind(user.id.0)
        .bind(user.name.as_str())
        .bind(&user.pronouns)
        .bind(user.account.email().as_str())
        .bind(user.account.password_hash())
        .bind(user.account.is_verified())
        .bind(user.account.verification_token())
        .bind(user.account.one_time_password())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserError::EmailAlreadyExists(
                        user.account.email().as_str().to_string(),
                    );
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }
}

fn row_to_user(row: PgRow) -> Result<User, UserError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let pronouns: String = row
        .try_get("pronouns")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let verified: bool = row
        .try_get("verified")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let verification_token: String = row
        .try_get("verification_token")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let one_time_password: String = row
        .try_get("one_time_password")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

    let account = Account::from_stored(
        EmailAddress::new(email)?,
        password_hash,
        verified,
        verification_token,
        one_time_password,
    );

    Ok(User::from_stored(
        UserId(id),
        UserName::new(name)?,
        pronouns,
        account,
        created_at,
    ))
}
