use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::user::models::LoginAttempt;
use crate::domain::user::ports::LoginAttemptRepository;
use crate::user::errors::UserError;

pub struct PostgresLoginAttemptRepository {
    pool: PgPool,
}

impl PostgresLoginAttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoginAttemptRepository for PostgresLoginAttemptRepository {
    async fn record(&self, attempt: LoginAttempt) -> Result<(), UserError> {
        sqlx::query(
            r#"
            INSERT INTO login_attempts (email, ip, successful, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&attempt.email)
        .bind(&attempt.ip)
        .bind(attempt.successful)
        .bind(attempt.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
