// src/models/session.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Server-side session. The token is what the client presents back.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Session {
  #[serde(skip_serializing)]
  pub token: String,
  pub user_id: i64,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.expires_at <= now
  }
}
