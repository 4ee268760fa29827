// tests/checkout_tests.rs
mod common;

use byteshop::db;
use byteshop::db::orders::{NewOrder, OrderScope, PlaceOrderError};
use byteshop::errors::AppError;
use byteshop::models::{OrderStatus, PaymentMethod, ProductStatus};
use common::*;

async fn order_count(state: &byteshop::AppState) -> usize {
  db::orders::list(&state.db_pool, OrderScope::All, None)
    .await
    .expect("list orders")
    .len()
}

#[tokio::test]
async fn test_checkout_places_order_and_empties_cart() {
  let m = marketplace().await;
  add_to_cart(&m.state, m.customer.id, m.headphones.id, 2).await.unwrap();
  add_to_cart(&m.state, m.customer.id, m.cable.id, 1).await.unwrap();

  let order = checkout(&m.state, m.customer.id, valid_delivery_form()).await.unwrap();

  assert_eq!(order.status, OrderStatus::Placed);
  assert_eq!(order.total_amount_cents, 2 * 150_000 + 25_000);
  assert_eq!(order.payment_method, PaymentMethod::Cod);
  assert_eq!(
    order.delivery_address,
    "Asha Rao, 12 MG Road, Pune, Maharashtra - 411001, Phone: 9876543210"
  );

  let items = db::orders::items(&m.state.db_pool, order.id).await.unwrap();
  assert_eq!(items.len(), 2);
  let items_total: i64 = items.iter().map(|i| i.subtotal_cents).sum();
  assert_eq!(items_total, order.total_amount_cents);
  assert!(items.iter().all(|i| i.market_id == m.market.id));

  assert_eq!(product_stock(&m.state, m.headphones.id).await, 3);
  assert_eq!(product_stock(&m.state, m.cable.id).await, 9);
  assert!(db::cart::lines_for_customer(&m.state.db_pool, m.customer.id)
    .await
    .unwrap()
    .is_empty());
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_rejected() {
  let m = marketplace().await;
  let result = checkout(&m.state, m.customer.id, valid_delivery_form()).await;
  assert!(matches!(result, Err(AppError::EmptyCart)), "got {:?}", result);
  assert_eq!(order_count(&m.state).await, 0);
}

#[tokio::test]
async fn test_invalid_delivery_details_leave_cart_untouched() {
  let m = marketplace().await;
  add_to_cart(&m.state, m.customer.id, m.cable.id, 2).await.unwrap();

  let mut form = valid_delivery_form();
  form.phone = "98765".to_string();
  let result = checkout(&m.state, m.customer.id, form).await;
  assert!(matches!(result, Err(AppError::Validation(_))), "got {:?}", result);

  let mut form = valid_delivery_form();
  form.payment_method = "Bitcoin".to_string();
  let result = checkout(&m.state, m.customer.id, form).await;
  assert!(matches!(result, Err(AppError::Validation(_))), "got {:?}", result);

  assert_eq!(order_count(&m.state).await, 0);
  assert_eq!(product_stock(&m.state, m.cable.id).await, 10);
  let lines = db::cart::lines_for_customer(&m.state.db_pool, m.customer.id).await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].quantity, 2);
}

#[tokio::test]
async fn test_checkout_blocked_when_stock_dropped_after_adding() {
  let m = marketplace().await;
  add_to_cart(&m.state, m.customer.id, m.headphones.id, 4).await.unwrap();
  sqlx::query("UPDATE products SET stock = 2 WHERE id = ?")
    .bind(m.headphones.id)
    .execute(&m.state.db_pool)
    .await
    .unwrap();

  let result = checkout(&m.state, m.customer.id, valid_delivery_form()).await;
  match result {
    Err(AppError::InsufficientStock { product }) => assert_eq!(product, "Headphones"),
    other => panic!("expected insufficient stock, got {:?}", other),
  }
  assert_eq!(order_count(&m.state).await, 0);
  assert_eq!(product_stock(&m.state, m.headphones.id).await, 2);
}

#[tokio::test]
async fn test_failed_stock_decrement_rolls_back_every_write() {
  let m = marketplace().await;
  add_to_cart(&m.state, m.customer.id, m.headphones.id, 1).await.unwrap();
  add_to_cart(&m.state, m.customer.id, m.cable.id, 3).await.unwrap();

  // Snapshot taken before a competing purchase drains the cable stock.
  let lines = db::cart::active_lines(&m.state.db_pool, m.customer.id).await.unwrap();
  sqlx::query("UPDATE products SET stock = 1 WHERE id = ?")
    .bind(m.cable.id)
    .execute(&m.state.db_pool)
    .await
    .unwrap();

  let new_order = NewOrder::new(m.customer.id, "somewhere".to_string(), PaymentMethod::Upi, lines).unwrap();
  let result = db::orders::place_order(&m.state.db_pool, &new_order).await;
  match result {
    Err(PlaceOrderError::InsufficientStock { product }) => assert_eq!(product, "USB Cable"),
    other => panic!("expected insufficient stock, got {:?}", other),
  }

  assert_eq!(order_count(&m.state).await, 0);
  let orphan_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
    .fetch_one(&m.state.db_pool)
    .await
    .unwrap();
  assert_eq!(orphan_items, 0);
  assert_eq!(product_stock(&m.state, m.headphones.id).await, 5);
  assert_eq!(product_stock(&m.state, m.cable.id).await, 1);
  assert_eq!(
    db::cart::lines_for_customer(&m.state.db_pool, m.customer.id).await.unwrap().len(),
    2
  );
}

#[tokio::test]
async fn test_inactive_products_are_left_out_of_the_order() {
  let m = marketplace().await;
  add_to_cart(&m.state, m.customer.id, m.headphones.id, 1).await.unwrap();
  add_to_cart(&m.state, m.customer.id, m.cable.id, 2).await.unwrap();
  db::products::set_status(&m.state.db_pool, m.headphones.id, ProductStatus::Inactive)
    .await
    .unwrap();

  let order = checkout(&m.state, m.customer.id, valid_delivery_form()).await.unwrap();
  assert_eq!(order.total_amount_cents, 2 * 25_000);
  let items = db::orders::items(&m.state.db_pool, order.id).await.unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].product_id, m.cable.id);
  assert_eq!(product_stock(&m.state, m.headphones.id).await, 5);
}

#[tokio::test]
async fn test_order_converts_into_app_error() {
  let err: AppError = PlaceOrderError::InsufficientStock {
    product: "USB Cable".to_string(),
  }
  .into();
  assert_eq!(err.code(), "insufficient_stock");

  let err: AppError = PlaceOrderError::Database(sqlx::Error::RowNotFound).into();
  assert!(matches!(err, AppError::OrderFailed));
}

#[tokio::test]
async fn test_two_line_order_totals_and_stock() {
  let m = marketplace().await;
  let lamp = create_product(&m.state, &m.market, "Desk Lamp", 10_000, 10).await;
  let clock = create_product(&m.state, &m.market, "Wall Clock", 25_000, 1).await;
  add_to_cart(&m.state, m.customer.id, lamp.id, 2).await.unwrap();
  add_to_cart(&m.state, m.customer.id, clock.id, 1).await.unwrap();

  let order = checkout(&m.state, m.customer.id, valid_delivery_form()).await.unwrap();
  assert_eq!(order.total_amount_cents, 45_000);

  let items = db::orders::items(&m.state.db_pool, order.id).await.unwrap();
  let subtotal_of = |product_id: i64| {
    items
      .iter()
      .find(|i| i.product_id == product_id)
      .map(|i| (i.quantity, i.unit_price_cents, i.subtotal_cents))
  };
  assert_eq!(subtotal_of(lamp.id), Some((2, 10_000, 20_000)));
  assert_eq!(subtotal_of(clock.id), Some((1, 25_000, 25_000)));

  assert_eq!(product_stock(&m.state, lamp.id).await, 8);
  assert_eq!(product_stock(&m.state, clock.id).await, 0);
  assert!(db::cart::lines_for_customer(&m.state.db_pool, m.customer.id)
    .await
    .unwrap()
    .is_empty());
}

#[tokio::test]
async fn test_stock_never_goes_negative_across_customers() {
  let m = marketplace().await;
  let second = create_user(&m.state, "second@example.com", byteshop::models::Role::Customer).await;
  add_to_cart(&m.state, second.id, m.headphones.id, 1).await.unwrap();
  add_to_cart(&m.state, m.customer.id, m.headphones.id, 5).await.unwrap();

  checkout(&m.state, m.customer.id, valid_delivery_form()).await.unwrap();
  assert_eq!(product_stock(&m.state, m.headphones.id).await, 0);

  let result = checkout(&m.state, second.id, valid_delivery_form()).await;
  assert!(matches!(result, Err(AppError::InsufficientStock { .. })), "got {:?}", result);
  assert_eq!(product_stock(&m.state, m.headphones.id).await, 0);
  assert_eq!(order_count(&m.state).await, 1);
  assert_eq!(
    db::cart::lines_for_customer(&m.state.db_pool, second.id).await.unwrap()[0].quantity,
    1
  );
}

#[tokio::test]
async fn test_order_total_that_would_overflow_is_rejected() {
  let m = marketplace().await;
  let priceless = create_product(&m.state, &m.market, "Crown Jewel", i64::MAX, 2).await;
  add_to_cart(&m.state, m.customer.id, priceless.id, 2).await.unwrap();

  let result = checkout(&m.state, m.customer.id, valid_delivery_form()).await;
  assert!(matches!(result, Err(AppError::Validation(_))), "got {:?}", result);
  assert_eq!(order_count(&m.state).await, 0);
  assert_eq!(product_stock(&m.state, priceless.id).await, 2);
  assert_eq!(
    db::cart::lines_for_customer(&m.state.db_pool, m.customer.id).await.unwrap().len(),
    1
  );
}
