use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::entities::Session;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::auth::ports::SessionRepository;

/// Database row structure for sessions table
#[derive(Debug, FromRow)]
struct SessionRow {
  id: Uuid,
  user_id: Uuid,
  token_hash: String,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    Session {
      id: row.id,
      user_id: row.user_id,
      token_hash: row.token_hash,
      expires_at: row.expires_at,
      created_at: row.created_at,
    }
  }
}

/// PostgreSQL implementation of the SessionRepository trait
pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  /// Creates a new PostgresSessionRepository with the given connection pool
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  /// Creates a new session in the database
  async fn create(&self, session: Session) -> Result<Session, RepositoryError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(&session.token_hash)
    .bind(session.expires_at)
    .bind(session.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create session: {}", e);
      RepositoryError::from(e)
    })?;

    Ok(row.into())
  }

  /// Finds a session by its token hash
  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, RepositoryError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            SELECT id, user_id, token_hash, expires_at, created_at
            FROM sessions
            WHERE token_hash = $1
            "#,
    )
    .bind(token_hash)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find session by token hash: {}", e);
      RepositoryError::from(e)
    })?;

    Ok(row.map(Into::into))
  }

  /// Deletes a specific session; a session that is already gone is not an error
  async fn delete(&self, session_id: Uuid) -> Result<(), RepositoryError> {
    let result = sqlx::query(
      r#"
            DELETE FROM sessions
            WHERE id = $1
            "#,
    )
    .bind(session_id)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to delete session: {}", e);
      RepositoryError::from(e)
    })?;

    if result.rows_affected() == 0 {
      tracing::debug!("Session {} was already deleted", session_id);
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_db::{insert_user, setup_test_db};
  use chrono::Duration;

  #[tokio::test]
  async fn test_create_and_find_session() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSessionRepository::new(pool.clone());

    let user_id = insert_user(&pool, "user@nextmail.com").await;
    let session =
      Session::with_duration(user_id, "unique_token_hash".to_string(), Duration::hours(1));

    let created = repo.create(session.clone()).await.unwrap();
    assert_eq!(created.id, session.id);

    let found = repo
      .find_by_token_hash("unique_token_hash")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.user_id, user_id);
    assert!(!found.is_expired());
  }

  #[tokio::test]
  async fn test_delete_session_twice() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresSessionRepository::new(pool.clone());

    let user_id = insert_user(&pool, "user@nextmail.com").await;
    let session = Session::with_duration(user_id, "to_delete".to_string(), Duration::hours(1));
    let created = repo.create(session).await.unwrap();

    repo.delete(created.id).await.unwrap();
    repo.delete(created.id).await.unwrap();

    assert!(repo.find_by_token_hash("to_delete").await.unwrap().is_none());
  }
}
