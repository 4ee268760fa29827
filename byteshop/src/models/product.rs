// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProductStatus {
  Active,
  Inactive,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub market_id: i64,
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub stock: i64,
  pub category: String,
  pub image_url: Option<String>,
  pub status: ProductStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Product detail as customers see it: the product plus its market's name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductWithMarket {
  #[sqlx(flatten)]
  #[serde(flatten)]
  pub product: Product,
  pub market_name: String,
}
