// src/db/products.rs

use crate::errors::{AppError, Result};
use crate::models::{Product, ProductStatus, ProductWithMarket};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const PRODUCT_COLUMNS: &str =
  "p.id, p.market_id, p.name, p.description, p.price_cents, p.stock, p.category, p.image_url, p.status, \
   p.created_at, p.updated_at";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
  PriceAsc,
  PriceDesc,
  Newest,
  #[default]
  Name,
}

impl ProductSort {
  fn order_by(&self) -> &'static str {
    match self {
      ProductSort::PriceAsc => " ORDER BY p.price_cents ASC, p.id ASC",
      ProductSort::PriceDesc => " ORDER BY p.price_cents DESC, p.id ASC",
      ProductSort::Newest => " ORDER BY p.created_at DESC, p.id DESC",
      ProductSort::Name => " ORDER BY p.name ASC, p.id ASC",
    }
  }
}

/// Filters for the products shown on a market page. Prices are in whole
/// currency units (`min_price=99.5`), compared against the cent amounts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
  pub search: Option<String>,
  pub category: Option<String>,
  pub min_price: Option<f64>,
  pub max_price: Option<f64>,
  #[serde(default)]
  pub sort: ProductSort,
}

fn to_cents(amount: f64) -> i64 {
  (amount * 100.0).round() as i64
}

/// Editable product fields, as submitted by the market owner.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub stock: i64,
  pub category: String,
  pub image_url: Option<String>,
}

impl ProductInput {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Product name is required.".to_string()));
    }
    if self.price_cents < 0 {
      return Err(AppError::Validation("Price cannot be negative.".to_string()));
    }
    if self.stock < 0 {
      return Err(AppError::Validation("Stock cannot be negative.".to_string()));
    }
    if self.category.trim().is_empty() {
      return Err(AppError::Validation("Category is required.".to_string()));
    }
    Ok(())
  }
}

/// Active products of one market, filtered and sorted for customers.
pub async fn list_for_market(pool: &SqlitePool, market_id: i64, filter: &ProductFilter) -> Result<Vec<Product>> {
  let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
    "SELECT {} FROM products p WHERE p.status = 'active' AND p.market_id = ",
    PRODUCT_COLUMNS
  ));
  qb.push_bind(market_id);

  if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    qb.push(" AND p.name LIKE ").push_bind(format!("%{}%", search));
  }
  if let Some(category) = filter.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    qb.push(" AND p.category = ").push_bind(category.to_string());
  }
  if let Some(min) = filter.min_price {
    qb.push(" AND p.price_cents >= ").push_bind(to_cents(min));
  }
  if let Some(max) = filter.max_price {
    qb.push(" AND p.price_cents <= ").push_bind(to_cents(max));
  }
  qb.push(filter.sort.order_by());

  let products = qb.build_query_as::<Product>().fetch_all(pool).await?;
  Ok(products)
}

/// A product customers may see: active, in an active market.
pub async fn find_visible(pool: &SqlitePool, product_id: i64) -> Result<Option<ProductWithMarket>> {
  let product = sqlx::query_as::<_, ProductWithMarket>(&format!(
    "SELECT {}, m.name AS market_name FROM products p JOIN markets m ON m.id = p.market_id \
     WHERE p.id = ? AND p.status = 'active' AND m.status = 'active'",
    PRODUCT_COLUMNS
  ))
  .bind(product_id)
  .fetch_optional(pool)
  .await?;
  Ok(product)
}

pub async fn find_by_id(pool: &SqlitePool, product_id: i64) -> Result<Option<Product>> {
  let product = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products p WHERE p.id = ?", PRODUCT_COLUMNS))
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
  Ok(product)
}

/// The product only if it belongs to `market_id`.
pub async fn find_in_market(pool: &SqlitePool, market_id: i64, product_id: i64) -> Result<Option<Product>> {
  let product = sqlx::query_as::<_, Product>(&format!(
    "SELECT {} FROM products p WHERE p.id = ? AND p.market_id = ?",
    PRODUCT_COLUMNS
  ))
  .bind(product_id)
  .bind(market_id)
  .fetch_optional(pool)
  .await?;
  Ok(product)
}

/// Every product of a market, inactive ones included, newest first.
pub async fn list_all_for_market(pool: &SqlitePool, market_id: i64) -> Result<Vec<Product>> {
  let products = sqlx::query_as::<_, Product>(&format!(
    "SELECT {} FROM products p WHERE p.market_id = ? ORDER BY p.created_at DESC, p.id DESC",
    PRODUCT_COLUMNS
  ))
  .bind(market_id)
  .fetch_all(pool)
  .await?;
  Ok(products)
}

pub async fn insert(pool: &SqlitePool, market_id: i64, input: &ProductInput) -> Result<Product> {
  let now = Utc::now();
  let product = sqlx::query_as::<_, Product>(
    "INSERT INTO products (market_id, name, description, price_cents, stock, category, image_url, status, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, 'active', ?, ?) \
     RETURNING id, market_id, name, description, price_cents, stock, category, image_url, status, created_at, updated_at",
  )
  .bind(market_id)
  .bind(input.name.trim())
  .bind(input.description.as_deref())
  .bind(input.price_cents)
  .bind(input.stock)
  .bind(input.category.trim())
  .bind(input.image_url.as_deref())
  .bind(now)
  .bind(now)
  .fetch_one(pool)
  .await?;
  Ok(product)
}

pub async fn update(pool: &SqlitePool, product_id: i64, input: &ProductInput) -> Result<Product> {
  let product = sqlx::query_as::<_, Product>(
    "UPDATE products SET name = ?, description = ?, price_cents = ?, stock = ?, category = ?, image_url = ?, updated_at = ? \
     WHERE id = ? \
     RETURNING id, market_id, name, description, price_cents, stock, category, image_url, status, created_at, updated_at",
  )
  .bind(input.name.trim())
  .bind(input.description.as_deref())
  .bind(input.price_cents)
  .bind(input.stock)
  .bind(input.category.trim())
  .bind(input.image_url.as_deref())
  .bind(Utc::now())
  .bind(product_id)
  .fetch_optional(pool)
  .await?;
  product.ok_or_else(|| AppError::NotFound(format!("Product {} not found.", product_id)))
}

/// Returns false when no product has that id.
pub async fn set_status(pool: &SqlitePool, product_id: i64, status: ProductStatus) -> Result<bool> {
  let result = sqlx::query("UPDATE products SET status = ?, updated_at = ? WHERE id = ?")
    .bind(status)
    .bind(Utc::now())
    .bind(product_id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() == 1)
}
