// src/db/reports.rs

//! Read-only aggregates for the admin dashboard and exports. Revenue always
//! excludes cancelled orders.

use crate::errors::Result;
use crate::models::{OrderStatus, Role};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoleCount {
  pub role: Role,
  pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusCount {
  pub status: OrderStatus,
  pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
  pub users_by_role: Vec<RoleCount>,
  pub total_users: i64,
  pub total_markets: i64,
  pub total_products: i64,
  pub total_orders: i64,
  pub revenue_cents: i64,
  pub orders_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MarketSales {
  pub market_id: i64,
  pub market_name: String,
  pub order_count: i64,
  pub units_sold: i64,
  pub revenue_cents: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopProduct {
  pub product_id: i64,
  pub product_name: String,
  pub market_name: String,
  pub units_sold: i64,
  pub revenue_cents: i64,
}

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64> {
  Ok(sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await?)
}

pub async fn dashboard(pool: &SqlitePool) -> Result<DashboardStats> {
  let users_by_role = sqlx::query_as::<_, RoleCount>("SELECT role, COUNT(*) AS count FROM users GROUP BY role ORDER BY role")
    .fetch_all(pool)
    .await?;
  let orders_by_status =
    sqlx::query_as::<_, StatusCount>("SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY status")
      .fetch_all(pool)
      .await?;

  Ok(DashboardStats {
    total_users: users_by_role.iter().map(|r| r.count).sum(),
    users_by_role,
    total_markets: count(pool, "SELECT COUNT(*) FROM markets").await?,
    total_products: count(pool, "SELECT COUNT(*) FROM products").await?,
    total_orders: orders_by_status.iter().map(|s| s.count).sum(),
    revenue_cents: count(
      pool,
      "SELECT COALESCE(SUM(total_amount_cents), 0) FROM orders WHERE status != 'cancelled'",
    )
    .await?,
    orders_by_status,
  })
}

/// One row per market, including markets that have sold nothing.
pub async fn sales_by_market(pool: &SqlitePool) -> Result<Vec<MarketSales>> {
  let rows = sqlx::query_as::<_, MarketSales>(
    "SELECT m.id AS market_id, m.name AS market_name, \
       COUNT(DISTINCT o.id) AS order_count, \
       COALESCE(SUM(CASE WHEN o.id IS NOT NULL THEN oi.quantity END), 0) AS units_sold, \
       COALESCE(SUM(CASE WHEN o.id IS NOT NULL THEN oi.subtotal_cents END), 0) AS revenue_cents \
     FROM markets m \
     LEFT JOIN order_items oi ON oi.market_id = m.id \
     LEFT JOIN orders o ON o.id = oi.order_id AND o.status != 'cancelled' \
     GROUP BY m.id, m.name \
     ORDER BY revenue_cents DESC, m.id ASC",
  )
  .fetch_all(pool)
  .await?;
  Ok(rows)
}

/// Best sellers by units, attributed to the market recorded on each order item.
pub async fn top_products(pool: &SqlitePool, limit: i64) -> Result<Vec<TopProduct>> {
  let rows = sqlx::query_as::<_, TopProduct>(
    "SELECT oi.product_id AS product_id, MAX(oi.product_name) AS product_name, m.name AS market_name, \
       SUM(oi.quantity) AS units_sold, SUM(oi.subtotal_cents) AS revenue_cents \
     FROM order_items oi \
     JOIN orders o ON o.id = oi.order_id AND o.status != 'cancelled' \
     JOIN markets m ON m.id = oi.market_id \
     GROUP BY oi.product_id, m.id, m.name \
     ORDER BY units_sold DESC, oi.product_id ASC \
     LIMIT ?",
  )
  .bind(limit)
  .fetch_all(pool)
  .await?;
  Ok(rows)
}
