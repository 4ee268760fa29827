// src/db/cart.rs

use crate::errors::Result;
use crate::models::{CartItem, CartLine};
use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

// A line counts as active only while both the product and its market are.
const CART_LINE_SELECT: &str = "SELECT c.id AS cart_item_id, p.id AS product_id, p.name AS product_name, \
   p.market_id AS market_id, c.quantity AS quantity, p.price_cents AS price_cents, p.stock AS stock, \
   CASE WHEN p.status = 'active' AND m.status = 'active' THEN 'active' ELSE 'inactive' END AS product_status \
   FROM cart_items c \
   JOIN products p ON p.id = c.product_id \
   JOIN markets m ON m.id = p.market_id";

/// Every cart line, including ones whose product is no longer purchasable.
pub async fn lines_for_customer(pool: &SqlitePool, customer_id: i64) -> Result<Vec<CartLine>> {
  let lines = sqlx::query_as::<_, CartLine>(&format!(
    "{} WHERE c.customer_id = ? ORDER BY c.added_at, c.id",
    CART_LINE_SELECT
  ))
  .bind(customer_id)
  .fetch_all(pool)
  .await?;
  Ok(lines)
}

/// Only the lines a checkout would order: active product, active market.
pub async fn active_lines<'e, E>(executor: E, customer_id: i64) -> Result<Vec<CartLine>>
where
  E: Executor<'e, Database = Sqlite>,
{
  let lines = sqlx::query_as::<_, CartLine>(&format!(
    "{} WHERE c.customer_id = ? AND p.status = 'active' AND m.status = 'active' ORDER BY c.added_at, c.id",
    CART_LINE_SELECT
  ))
  .bind(customer_id)
  .fetch_all(executor)
  .await?;
  Ok(lines)
}

pub async fn find_item(pool: &SqlitePool, customer_id: i64, cart_item_id: i64) -> Result<Option<CartItem>> {
  let item = sqlx::query_as::<_, CartItem>(
    "SELECT id, customer_id, product_id, quantity, added_at FROM cart_items WHERE id = ? AND customer_id = ?",
  )
  .bind(cart_item_id)
  .bind(customer_id)
  .fetch_optional(pool)
  .await?;
  Ok(item)
}

/// Quantity of `product_id` already in the cart, 0 if absent.
pub async fn quantity_in_cart(pool: &SqlitePool, customer_id: i64, product_id: i64) -> Result<i64> {
  let quantity = sqlx::query_scalar::<_, i64>(
    "SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE customer_id = ? AND product_id = ?",
  )
  .bind(customer_id)
  .bind(product_id)
  .fetch_one(pool)
  .await?;
  Ok(quantity)
}

/// Adds `quantity` to the customer's row for the product, creating it if needed.
pub async fn add_quantity(pool: &SqlitePool, customer_id: i64, product_id: i64, quantity: i64) -> Result<CartItem> {
  let item = sqlx::query_as::<_, CartItem>(
    "INSERT INTO cart_items (customer_id, product_id, quantity, added_at) VALUES (?, ?, ?, ?) \
     ON CONFLICT (customer_id, product_id) DO UPDATE SET quantity = cart_items.quantity + excluded.quantity \
     RETURNING id, customer_id, product_id, quantity, added_at",
  )
  .bind(customer_id)
  .bind(product_id)
  .bind(quantity)
  .bind(Utc::now())
  .fetch_one(pool)
  .await?;
  Ok(item)
}

pub async fn set_quantity(pool: &SqlitePool, customer_id: i64, cart_item_id: i64, quantity: i64) -> Result<bool> {
  let result = sqlx::query("UPDATE cart_items SET quantity = ? WHERE id = ? AND customer_id = ?")
    .bind(quantity)
    .bind(cart_item_id)
    .bind(customer_id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() == 1)
}

pub async fn remove(pool: &SqlitePool, customer_id: i64, cart_item_id: i64) -> Result<bool> {
  let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND customer_id = ?")
    .bind(cart_item_id)
    .bind(customer_id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() == 1)
}

pub async fn clear<'e, E>(executor: E, customer_id: i64) -> Result<u64>
where
  E: Executor<'e, Database = Sqlite>,
{
  let result = sqlx::query("DELETE FROM cart_items WHERE customer_id = ?")
    .bind(customer_id)
    .execute(executor)
    .await?;
  Ok(result.rows_affected())
}
