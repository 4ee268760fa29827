// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub session_ttl_hours: i64,
  pub app_base_url: String,
  /// Bootstrap admin account; both must be set for it to be created.
  pub admin_email: Option<String>,
  pub admin_password: Option<String>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_var("SERVER_PORT", get_env("SERVER_PORT"), 8080u16)?;
    let database_url = get_env("DATABASE_URL").unwrap_or_else(|| "sqlite://byteshop.db?mode=rwc".to_string());
    let db_max_connections = parse_var("DB_MAX_CONNECTIONS", get_env("DB_MAX_CONNECTIONS"), 5u32)?;
    if db_max_connections == 0 {
      return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string()));
    }
    let session_ttl_hours = parse_var("SESSION_TTL_HOURS", get_env("SESSION_TTL_HOURS"), 168i64)?;
    if session_ttl_hours <= 0 {
      return Err(AppError::Config("SESSION_TTL_HOURS must be positive".to_string()));
    }
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|| format!("http://{}:{}", server_host, server_port));

    let admin_email = get_env("ADMIN_EMAIL");
    let admin_password = get_env("ADMIN_PASSWORD");
    if admin_email.is_some() != admin_password.is_some() {
      return Err(AppError::Config(
        "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".to_string(),
      ));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      session_ttl_hours,
      app_base_url,
      admin_email,
      admin_password,
    })
  }

  /// Configuration for tests and embedded use: in-memory database, no admin.
  pub fn for_database(database_url: impl Into<String>) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: database_url.into(),
      db_max_connections: 1,
      session_ttl_hours: 168,
      app_base_url: "http://127.0.0.1:8080".to_string(),
      admin_email: None,
      admin_password: None,
    }
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
  }
}
