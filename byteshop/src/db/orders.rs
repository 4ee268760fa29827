// src/db/orders.rs

use crate::errors::{AppError, Result};
use crate::models::{total_cents, CartLine, Order, OrderItem, OrderStatus, PaymentMethod};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

const ORDER_COLUMNS: &str =
  "o.id, o.customer_id, o.total_amount_cents, o.status, o.delivery_address, o.payment_method, o.created_at, o.updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, market_id, product_name, quantity, unit_price_cents, subtotal_cents";

/// Everything needed to turn a cart snapshot into an order. Built through
/// `new`, which settles every amount before a transaction is opened.
#[derive(Debug, Clone)]
pub struct NewOrder {
  customer_id: i64,
  delivery_address: String,
  payment_method: PaymentMethod,
  lines: Vec<(CartLine, i64)>,
  total_cents: i64,
}

impl NewOrder {
  pub fn new(
    customer_id: i64,
    delivery_address: String,
    payment_method: PaymentMethod,
    lines: Vec<CartLine>,
  ) -> Result<Self> {
    let total_cents = total_cents(&lines)?;
    let lines = lines
      .into_iter()
      .map(|line| line.subtotal_cents().map(|subtotal| (line, subtotal)))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self {
      customer_id,
      delivery_address,
      payment_method,
      lines,
      total_cents,
    })
  }
}

#[derive(Debug, Error)]
pub enum PlaceOrderError {
  /// The conditional stock decrement matched no row.
  #[error("insufficient stock for {product}")]
  InsufficientStock { product: String },

  #[error("database error while placing order: {0}")]
  Database(#[from] sqlx::Error),
}

impl From<PlaceOrderError> for AppError {
  fn from(err: PlaceOrderError) -> Self {
    match err {
      PlaceOrderError::InsufficientStock { product } => AppError::InsufficientStock { product },
      PlaceOrderError::Database(e) => {
        error!(error = %e, "Order placement rolled back.");
        AppError::OrderFailed
      }
    }
  }
}

/// Writes the order, its items, the stock decrements and the cart deletion in
/// one transaction. On any error nothing is persisted.
#[instrument(
  name = "db::orders::place_order",
  skip(pool, new_order),
  fields(customer_id = new_order.customer_id, lines = new_order.lines.len()),
  err(Display)
)]
pub async fn place_order(pool: &SqlitePool, new_order: &NewOrder) -> std::result::Result<Order, PlaceOrderError> {
  let mut tx = pool.begin().await?;

  match write_order(&mut tx, new_order).await {
    Ok(order) => {
      tx.commit().await?;
      info!(order_id = order.id, total_cents = order.total_amount_cents, "Order committed.");
      Ok(order)
    }
    Err(e) => {
      if let Err(rollback_err) = tx.rollback().await {
        warn!(error = %rollback_err, "Rollback after failed order placement also failed.");
      }
      Err(e)
    }
  }
}

async fn write_order(
  tx: &mut Transaction<'_, Sqlite>,
  new_order: &NewOrder,
) -> std::result::Result<Order, PlaceOrderError> {
  let now = Utc::now();

  let order = sqlx::query_as::<_, Order>(
    "INSERT INTO orders (customer_id, total_amount_cents, status, delivery_address, payment_method, created_at, updated_at) \
     VALUES (?, ?, 'placed', ?, ?, ?, ?) \
     RETURNING id, customer_id, total_amount_cents, status, delivery_address, payment_method, created_at, updated_at",
  )
  .bind(new_order.customer_id)
  .bind(new_order.total_cents)
  .bind(&new_order.delivery_address)
  .bind(new_order.payment_method)
  .bind(now)
  .bind(now)
  .fetch_one(&mut **tx)
  .await?;

  for (line, subtotal_cents) in &new_order.lines {
    let decremented = sqlx::query("UPDATE products SET stock = stock - ?, updated_at = ? WHERE id = ? AND stock >= ?")
      .bind(line.quantity)
      .bind(now)
      .bind(line.product_id)
      .bind(line.quantity)
      .execute(&mut **tx)
      .await?;
    if decremented.rows_affected() != 1 {
      warn!(product_id = line.product_id, quantity = line.quantity, "Stock decrement matched no row.");
      return Err(PlaceOrderError::InsufficientStock {
        product: line.product_name.clone(),
      });
    }

    sqlx::query(
      "INSERT INTO order_items (order_id, product_id, market_id, product_name, quantity, unit_price_cents, subtotal_cents) \
       VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(line.product_id)
    .bind(line.market_id)
    .bind(&line.product_name)
    .bind(line.quantity)
    .bind(line.price_cents)
    .bind(*subtotal_cents)
    .execute(&mut **tx)
    .await?;
  }

  sqlx::query("DELETE FROM cart_items WHERE customer_id = ?")
    .bind(new_order.customer_id)
    .execute(&mut **tx)
    .await?;

  Ok(order)
}

/// Which orders a listing may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
  Customer(i64),
  /// Orders with at least one item from this market.
  Market(i64),
  All,
}

pub async fn list(pool: &SqlitePool, scope: OrderScope, status: Option<OrderStatus>) -> Result<Vec<Order>> {
  let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!("SELECT {} FROM orders o WHERE 1 = 1", ORDER_COLUMNS));
  match scope {
    OrderScope::Customer(customer_id) => {
      qb.push(" AND o.customer_id = ").push_bind(customer_id);
    }
    OrderScope::Market(market_id) => {
      qb.push(" AND EXISTS (SELECT 1 FROM order_items oi WHERE oi.order_id = o.id AND oi.market_id = ")
        .push_bind(market_id)
        .push(")");
    }
    OrderScope::All => {}
  }
  if let Some(status) = status {
    qb.push(" AND o.status = ").push_bind(status);
  }
  qb.push(" ORDER BY o.created_at DESC, o.id DESC");

  let orders = qb.build_query_as::<Order>().fetch_all(pool).await?;
  Ok(orders)
}

pub async fn find_by_id(pool: &SqlitePool, order_id: i64) -> Result<Option<Order>> {
  let order = sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders o WHERE o.id = ?", ORDER_COLUMNS))
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
  Ok(order)
}

pub async fn items(pool: &SqlitePool, order_id: i64) -> Result<Vec<OrderItem>> {
  let items = sqlx::query_as::<_, OrderItem>(&format!(
    "SELECT {} FROM order_items WHERE order_id = ? ORDER BY id",
    ITEM_COLUMNS
  ))
  .bind(order_id)
  .fetch_all(pool)
  .await?;
  Ok(items)
}

pub async fn items_for_market(pool: &SqlitePool, order_id: i64, market_id: i64) -> Result<Vec<OrderItem>> {
  let items = sqlx::query_as::<_, OrderItem>(&format!(
    "SELECT {} FROM order_items WHERE order_id = ? AND market_id = ? ORDER BY id",
    ITEM_COLUMNS
  ))
  .bind(order_id)
  .bind(market_id)
  .fetch_all(pool)
  .await?;
  Ok(items)
}

pub async fn touches_market(pool: &SqlitePool, order_id: i64, market_id: i64) -> Result<bool> {
  let touches = sqlx::query_scalar::<_, bool>(
    "SELECT EXISTS(SELECT 1 FROM order_items WHERE order_id = ? AND market_id = ?)",
  )
  .bind(order_id)
  .bind(market_id)
  .fetch_one(pool)
  .await?;
  Ok(touches)
}

/// Changes only the status column. Returns false when the order is gone.
pub async fn update_status(pool: &SqlitePool, order_id: i64, status: OrderStatus) -> Result<bool> {
  let result = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
    .bind(status)
    .bind(Utc::now())
    .bind(order_id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() == 1)
}
