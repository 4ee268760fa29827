// src/db/mod.rs

//! Connection setup and the SQL behind every ByteShop operation.
//!
//! Each submodule owns one table (or one family of read-only reports). The
//! functions take a pool, except where a caller must compose them inside a
//! transaction.

pub mod cart;
pub mod markets;
pub mod orders;
pub mod products;
pub mod reports;
pub mod sessions;
pub mod users;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::Role;
use crate::services::auth_service;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{info, instrument};

const SCHEMA: &str = include_str!("../../migrations/0001_schema.sql");

/// Opens the pool described by `DATABASE_URL`, with foreign keys enforced.
#[instrument(name = "db::connect", skip(config), err(Display))]
pub async fn connect(config: &AppConfig) -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str(&config.database_url)
    .map_err(|e| AppError::Config(format!("Invalid DATABASE_URL: {}", e)))?
    .foreign_keys(true)
    .create_if_missing(true);

  let pool = SqlitePoolOptions::new()
    .max_connections(config.db_max_connections)
    .connect_with(options)
    .await?;
  info!("Connected to the database.");
  Ok(pool)
}

/// A private in-memory database on a single connection that never recycles,
/// so every query sees the same data.
pub async fn connect_in_memory() -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .idle_timeout(None)
    .max_lifetime(None)
    .connect_with(options)
    .await?;
  Ok(pool)
}

#[instrument(name = "db::apply_schema", skip(pool), err(Display))]
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
  sqlx::raw_sql(SCHEMA).execute(pool).await?;
  info!("Database schema applied.");
  Ok(())
}

/// Creates the configured admin account unless a user with that email exists.
#[instrument(name = "db::bootstrap_admin", skip_all, err(Display))]
pub async fn bootstrap_admin(pool: &SqlitePool, config: &AppConfig) -> Result<()> {
  let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
    return Ok(());
  };
  let email = email.trim().to_lowercase();

  if users::email_exists(pool, &email).await? {
    info!(email = %email, "Admin account already present.");
    return Ok(());
  }

  let password_hash = auth_service::hash_password(password)?;
  let admin = users::insert(pool, &email, &password_hash, "Administrator", Role::Admin).await?;
  info!(user_id = admin.id, "Bootstrapped admin account.");
  Ok(())
}

/// True for SQLite UNIQUE constraint failures.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
