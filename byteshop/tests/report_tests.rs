// tests/report_tests.rs
mod common;

use byteshop::db;
use byteshop::models::{OrderStatus, Role};
use byteshop::services::report_export;
use common::*;

#[tokio::test]
async fn test_reports_exclude_cancelled_orders() {
  let m = marketplace().await;
  let quiet_owner = create_user(&m.state, "quiet@example.com", Role::ShopOwner).await;
  let quiet_market = create_market(&m.state, &quiet_owner, "Quiet Corner").await;

  add_to_cart(&m.state, m.customer.id, m.headphones.id, 2).await.unwrap();
  let kept = checkout(&m.state, m.customer.id, valid_delivery_form()).await.unwrap();
  add_to_cart(&m.state, m.customer.id, m.cable.id, 4).await.unwrap();
  let dropped = checkout(&m.state, m.customer.id, valid_delivery_form()).await.unwrap();
  update_status(&m.state, &m.owner, dropped.id, "cancelled").await.unwrap();

  let stats = db::reports::dashboard(&m.state.db_pool).await.unwrap();
  assert_eq!(stats.total_users, 3);
  assert_eq!(stats.total_markets, 2);
  assert_eq!(stats.total_products, 2);
  assert_eq!(stats.total_orders, 2);
  assert_eq!(stats.revenue_cents, kept.total_amount_cents);
  let cancelled = stats
    .orders_by_status
    .iter()
    .find(|s| s.status == OrderStatus::Cancelled)
    .map(|s| s.count);
  assert_eq!(cancelled, Some(1));

  let sales = db::reports::sales_by_market(&m.state.db_pool).await.unwrap();
  assert_eq!(sales.len(), 2);
  assert_eq!(sales[0].market_id, m.market.id);
  assert_eq!(sales[0].order_count, 1);
  assert_eq!(sales[0].units_sold, 2);
  assert_eq!(sales[0].revenue_cents, 300_000);
  assert_eq!(sales[1].market_id, quiet_market.id);
  assert_eq!(sales[1].order_count, 0);
  assert_eq!(sales[1].revenue_cents, 0);

  let top = db::reports::top_products(&m.state.db_pool, 10).await.unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0].product_id, m.headphones.id);
  assert_eq!(top[0].market_name, "Gadget Bazaar");
}

#[tokio::test]
async fn test_export_produces_xlsx_workbook() {
  let m = marketplace().await;
  add_to_cart(&m.state, m.customer.id, m.cable.id, 1).await.unwrap();
  checkout(&m.state, m.customer.id, valid_delivery_form()).await.unwrap();

  let pool = &m.state.db_pool;
  let stats = db::reports::dashboard(pool).await.unwrap();
  let sales = db::reports::sales_by_market(pool).await.unwrap();
  let top = db::reports::top_products(pool, 10).await.unwrap();

  let bytes = report_export::build_workbook(&stats, &sales, &top).unwrap();
  assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_top_products_follow_the_order_item_snapshot() {
  let m = marketplace().await;
  add_to_cart(&m.state, m.customer.id, m.cable.id, 3).await.unwrap();
  checkout(&m.state, m.customer.id, valid_delivery_form()).await.unwrap();

  let new_owner = create_user(&m.state, "new-owner@example.com", Role::ShopOwner).await;
  let new_market = create_market(&m.state, &new_owner, "Cable Corner").await;
  sqlx::query("UPDATE products SET market_id = ?, name = ? WHERE id = ?")
    .bind(new_market.id)
    .bind("Braided Cable")
    .bind(m.cable.id)
    .execute(&m.state.db_pool)
    .await
    .unwrap();

  let top = db::reports::top_products(&m.state.db_pool, 10).await.unwrap();
  assert_eq!(top.len(), 1);
  assert_eq!(top[0].product_id, m.cable.id);
  assert_eq!(top[0].product_name, "USB Cable");
  assert_eq!(top[0].market_name, "Gadget Bazaar");
  assert_eq!(top[0].units_sold, 3);
  assert_eq!(top[0].revenue_cents, 75_000);
}
