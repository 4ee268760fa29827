// src/models/market.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MarketStatus {
  Active,
  /// Hidden from customers together with all of its products.
  Suspended,
}

/// A vendor storefront. Each shop owner owns at most one.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Market {
  pub id: i64,
  pub owner_id: i64,
  pub name: String,
  pub description: Option<String>,
  pub city: String,
  pub category: String,
  pub image_url: Option<String>,
  pub status: MarketStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
