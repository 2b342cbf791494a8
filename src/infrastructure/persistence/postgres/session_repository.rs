use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::entities::Session;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::SessionRepository;

#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  token_hash: String,
  user_email: String,
  created_at: DateTime<Utc>,
  expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    Session {
      id: row.id,
      token_hash: row.token_hash,
      user_email: row.user_email,
      created_at: row.created_at,
      expires_at: row.expires_at,
    }
  }
}

pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  async fn create(&self, session: Session) -> Result<Session, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            INSERT INTO sessions (id, token_hash, user_email, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, token_hash, user_email, created_at, expires_at
            "#,
    )
    .bind(session.id)
    .bind(&session.token_hash)
    .bind(&session.user_email)
    .bind(session.created_at)
    .bind(session.expires_at)
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            SELECT id, token_hash, user_email, created_at, expires_at
            FROM sessions
            WHERE token_hash = $1
            "#,
    )
    .bind(token_hash)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Session::from))
  }

  async fn delete(&self, token_hash: &str) -> Result<(), AuthError> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
      .bind(token_hash)
      .execute(&self.pool)
      .await?;

    Ok(())
  }

  async fn delete_expired(&self) -> Result<u64, AuthError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected())
  }
}
