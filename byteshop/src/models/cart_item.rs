// src/models/cart_item.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::ProductStatus;
use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
  pub id: i64,
  pub customer_id: i64,
  pub product_id: i64,
  pub quantity: i64,
  pub added_at: DateTime<Utc>,
}

/// A cart row joined with the live product it points at.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
  pub cart_item_id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub market_id: i64,
  pub quantity: i64,
  pub price_cents: i64,
  pub stock: i64,
  pub product_status: ProductStatus,
}

impl CartLine {
  /// `quantity * price_cents`; an amount outside `i64` is a validation error.
  pub fn subtotal_cents(&self) -> Result<i64> {
    self
      .quantity
      .checked_mul(self.price_cents)
      .ok_or_else(|| AppError::Validation(format!("The amount for {} is too large.", self.product_name)))
  }
}

/// Sum of the lines' subtotals, with the same overflow rule.
pub fn total_cents(lines: &[CartLine]) -> Result<i64> {
  lines.iter().try_fold(0i64, |total, line| {
    total
      .checked_add(line.subtotal_cents()?)
      .ok_or_else(|| AppError::Validation("The order total is too large.".to_string()))
  })
}
