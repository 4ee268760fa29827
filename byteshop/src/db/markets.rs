// src/db/markets.rs

use crate::errors::{AppError, Result};
use crate::models::{Market, MarketStatus};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const MARKET_COLUMNS: &str = "id, owner_id, name, description, city, category, image_url, status, created_at, updated_at";

/// Customer-facing market listing filters; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketFilter {
  pub search: Option<String>,
  pub city: Option<String>,
  pub category: Option<String>,
}

/// Editable market fields, as submitted by its owner.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketInput {
  pub name: String,
  pub description: Option<String>,
  pub city: String,
  pub category: String,
  pub image_url: Option<String>,
}

impl MarketInput {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Market name is required.".to_string()));
    }
    if self.city.trim().is_empty() {
      return Err(AppError::Validation("City is required.".to_string()));
    }
    if self.category.trim().is_empty() {
      return Err(AppError::Validation("Category is required.".to_string()));
    }
    Ok(())
  }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn list_active(pool: &SqlitePool, filter: &MarketFilter) -> Result<Vec<Market>> {
  let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
    "SELECT {} FROM markets WHERE status = 'active'",
    MARKET_COLUMNS
  ));
  if let Some(search) = non_blank(&filter.search) {
    qb.push(" AND name LIKE ").push_bind(format!("%{}%", search));
  }
  if let Some(city) = non_blank(&filter.city) {
    qb.push(" AND city = ").push_bind(city.to_string());
  }
  if let Some(category) = non_blank(&filter.category) {
    qb.push(" AND category = ").push_bind(category.to_string());
  }
  qb.push(" ORDER BY name, id");

  let markets = qb.build_query_as::<Market>().fetch_all(pool).await?;
  Ok(markets)
}

pub async fn find_active(pool: &SqlitePool, market_id: i64) -> Result<Option<Market>> {
  let market = sqlx::query_as::<_, Market>(&format!(
    "SELECT {} FROM markets WHERE id = ? AND status = 'active'",
    MARKET_COLUMNS
  ))
  .bind(market_id)
  .fetch_optional(pool)
  .await?;
  Ok(market)
}

pub async fn find_by_id(pool: &SqlitePool, market_id: i64) -> Result<Option<Market>> {
  let market = sqlx::query_as::<_, Market>(&format!("SELECT {} FROM markets WHERE id = ?", MARKET_COLUMNS))
    .bind(market_id)
    .fetch_optional(pool)
    .await?;
  Ok(market)
}

pub async fn find_by_owner(pool: &SqlitePool, owner_id: i64) -> Result<Option<Market>> {
  let market = sqlx::query_as::<_, Market>(&format!("SELECT {} FROM markets WHERE owner_id = ?", MARKET_COLUMNS))
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
  Ok(market)
}

/// Creates the owner's market. A second market for the same owner is a conflict.
pub async fn insert(pool: &SqlitePool, owner_id: i64, input: &MarketInput) -> Result<Market> {
  let now = Utc::now();
  sqlx::query_as::<_, Market>(&format!(
    "INSERT INTO markets (owner_id, name, description, city, category, image_url, status, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, 'active', ?, ?) RETURNING {}",
    MARKET_COLUMNS
  ))
  .bind(owner_id)
  .bind(input.name.trim())
  .bind(input.description.as_deref())
  .bind(input.city.trim())
  .bind(input.category.trim())
  .bind(input.image_url.as_deref())
  .bind(now)
  .bind(now)
  .fetch_one(pool)
  .await
  .map_err(|e| {
    if super::is_unique_violation(&e) {
      AppError::Conflict("You already have a market.".to_string())
    } else {
      AppError::Sqlx(e)
    }
  })
}

pub async fn update(pool: &SqlitePool, market_id: i64, input: &MarketInput) -> Result<Market> {
  let market = sqlx::query_as::<_, Market>(&format!(
    "UPDATE markets SET name = ?, description = ?, city = ?, category = ?, image_url = ?, updated_at = ? \
     WHERE id = ? RETURNING {}",
    MARKET_COLUMNS
  ))
  .bind(input.name.trim())
  .bind(input.description.as_deref())
  .bind(input.city.trim())
  .bind(input.category.trim())
  .bind(input.image_url.as_deref())
  .bind(Utc::now())
  .bind(market_id)
  .fetch_optional(pool)
  .await?;
  market.ok_or_else(|| AppError::NotFound(format!("Market {} not found.", market_id)))
}

/// Returns false when no market has that id.
pub async fn set_status(pool: &SqlitePool, market_id: i64, status: MarketStatus) -> Result<bool> {
  let result = sqlx::query("UPDATE markets SET status = ?, updated_at = ? WHERE id = ?")
    .bind(status)
    .bind(Utc::now())
    .bind(market_id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() == 1)
}
