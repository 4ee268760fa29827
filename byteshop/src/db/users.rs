// src/db/users.rs

use crate::errors::Result;
use crate::models::{Role, User};
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, email, password_hash, full_name, role, created_at";

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
    .bind(email)
    .fetch_optional(pool)
    .await?;
  Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  Ok(user)
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool> {
  let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)")
    .bind(email)
    .fetch_one(pool)
    .await?;
  Ok(exists)
}

pub async fn insert(pool: &SqlitePool, email: &str, password_hash: &str, full_name: &str, role: Role) -> Result<User> {
  let user = sqlx::query_as::<_, User>(&format!(
    "INSERT INTO users (email, password_hash, full_name, role, created_at) VALUES (?, ?, ?, ?, ?) RETURNING {}",
    USER_COLUMNS
  ))
  .bind(email)
  .bind(password_hash)
  .bind(full_name)
  .bind(role)
  .bind(Utc::now())
  .fetch_one(pool)
  .await?;
  Ok(user)
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<User>> {
  let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
    .fetch_all(pool)
    .await?;
  Ok(users)
}
