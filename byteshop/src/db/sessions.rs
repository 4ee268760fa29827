// src/db/sessions.rs

use crate::errors::Result;
use crate::models::{Role, Session};
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

/// A session joined with the identity it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct SessionIdentity {
  pub user_id: i64,
  pub email: String,
  pub full_name: String,
  pub role: Role,
  pub expires_at: DateTime<Utc>,
}

pub async fn create(pool: &SqlitePool, user_id: i64, ttl_hours: i64) -> Result<Session> {
  let now = Utc::now();
  let session = sqlx::query_as::<_, Session>(
    "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?) \
     RETURNING token, user_id, created_at, expires_at",
  )
  .bind(Uuid::new_v4().to_string())
  .bind(user_id)
  .bind(now)
  .bind(now + Duration::hours(ttl_hours))
  .fetch_one(pool)
  .await?;
  Ok(session)
}

pub async fn find_identity(pool: &SqlitePool, token: &str) -> Result<Option<SessionIdentity>> {
  let identity = sqlx::query_as::<_, SessionIdentity>(
    "SELECT u.id AS user_id, u.email, u.full_name, u.role, s.expires_at \
     FROM sessions s JOIN users u ON u.id = s.user_id \
     WHERE s.token = ?",
  )
  .bind(token)
  .fetch_optional(pool)
  .await?;
  Ok(identity)
}

pub async fn delete(pool: &SqlitePool, token: &str) -> Result<bool> {
  let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() > 0)
}

/// Drops a user's sessions that have already expired.
pub async fn delete_expired_for_user(pool: &SqlitePool, user_id: i64) -> Result<u64> {
  let result = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND expires_at <= ?")
    .bind(user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;
  Ok(result.rows_affected())
}
