// src/services/cart_service.rs

//! Cart reads and the simple cart edits that need no pipeline.

use crate::db;
use crate::errors::{AppError, Result};
use crate::models::{total_cents, CartLine, ProductStatus};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, instrument};

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
  pub lines: Vec<CartLine>,
  /// Sum over lines that can still be ordered.
  pub total_cents: i64,
  pub item_count: i64,
}

impl CartView {
  pub fn from_lines(lines: Vec<CartLine>) -> Result<Self> {
    let active: Vec<CartLine> = lines
      .iter()
      .filter(|l| l.product_status == ProductStatus::Active)
      .cloned()
      .collect();
    let total_cents = total_cents(&active)?;
    let item_count = active
      .iter()
      .try_fold(0i64, |count, line| count.checked_add(line.quantity))
      .ok_or_else(|| AppError::Validation("The cart holds too many items.".to_string()))?;
    Ok(Self {
      lines,
      total_cents,
      item_count,
    })
  }
}

pub async fn view_cart(pool: &SqlitePool, customer_id: i64) -> Result<CartView> {
  let lines = db::cart::lines_for_customer(pool, customer_id).await?;
  CartView::from_lines(lines)
}

/// Sets a cart row's quantity; the row must belong to the customer and the
/// quantity must be between 1 and the product's stock.
#[instrument(name = "cart_service::update_quantity", skip(pool), err(Display))]
pub async fn update_quantity(pool: &SqlitePool, customer_id: i64, cart_item_id: i64, quantity: i64) -> Result<CartView> {
  if quantity < 1 {
    return Err(AppError::Validation("Quantity must be at least 1.".to_string()));
  }
  let item = db::cart::find_item(pool, customer_id, cart_item_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Cart item {} not found.", cart_item_id)))?;
  let product = db::products::find_by_id(pool, item.product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found.", item.product_id)))?;

  if quantity > product.stock {
    return Err(AppError::Validation(format!(
      "Only {} of {} in stock.",
      product.stock, product.name
    )));
  }

  db::cart::set_quantity(pool, customer_id, cart_item_id, quantity).await?;
  info!("Cart quantity updated.");
  view_cart(pool, customer_id).await
}

pub async fn remove_item(pool: &SqlitePool, customer_id: i64, cart_item_id: i64) -> Result<CartView> {
  if !db::cart::remove(pool, customer_id, cart_item_id).await? {
    return Err(AppError::NotFound(format!("Cart item {} not found.", cart_item_id)));
  }
  view_cart(pool, customer_id).await
}

pub async fn clear_cart(pool: &SqlitePool, customer_id: i64) -> Result<u64> {
  db::cart::clear(pool, customer_id).await
}
