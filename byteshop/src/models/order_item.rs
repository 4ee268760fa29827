// src/models/order_item.rs

use serde::Serialize;
use sqlx::FromRow;

/// A line of an order. Price, name and market are copied at checkout so the
/// order stays stable when the live product changes; rows are never updated.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: i64,
  pub order_id: i64,
  pub product_id: i64,
  pub market_id: i64,
  pub product_name: String,
  pub quantity: i64,
  pub unit_price_cents: i64,
  pub subtotal_cents: i64,
}
