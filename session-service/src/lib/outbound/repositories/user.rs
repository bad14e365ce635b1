use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::User;
use crate::domain::session::models::UserId;
use crate::domain::session::ports::UserRepository;
use crate::session::errors::SessionError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    hashed_password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = SessionError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.hashed_password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SessionError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, hashed_password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn update_credentials(
        &self,
        id: &UserId,
        email: &EmailAddress,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, SessionError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET email = $2, hashed_password = $3, updated_at = $4
            WHERE id = $1
            RETURNING id, email, hashed_password, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return SessionError::EmailAlreadyExists(email.as_str().to_string());
                }
            }
            SessionError::DatabaseError(e.to_string())
        })?;

        row.map(User::try_from).transpose()
    }

    async fn delete_all(&self) -> Result<u64, SessionError> {
        sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected())
            .map_err(|e| SessionError::DatabaseError(e.to_string()))
    }
}
