// src/pipelines/checkout_pipeline.rs

//! Order placement. The first three steps only read; every write happens in
//! `place_order`, inside one transaction.

use crate::db;
use crate::db::orders::NewOrder;
use crate::errors::AppError;
use crate::models::total_cents;
use crate::pipelines::contexts::CheckoutCtxData;
use byteshop_flow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{info, warn};

pub fn register_checkout_pipeline(flows: &Flows<AppError>) {
  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("validate_delivery_details", false, None),
    ("load_cart_snapshot", false, None),
    ("verify_stock", false, None),
    ("place_order", false, None),
  ]);

  p.on("validate_delivery_details", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let form = { ctx_data.read().form.clone() };
    let details = form.validate()?;
    ctx_data.write().delivery = Some(details);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("load_cart_snapshot", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let (customer_id, db_pool) = {
      let guard = ctx_data.read();
      (guard.customer_id, guard.app_state.db_pool.clone())
    };

    let lines = db::cart::active_lines(&db_pool, customer_id).await?;
    if lines.is_empty() {
      info!(customer_id, "Checkout with an empty cart.");
      return Err(AppError::EmptyCart);
    }

    let total_cents = total_cents(&lines)?;
    {
      let mut guard = ctx_data.write();
      guard.lines = lines;
      guard.total_cents = total_cents;
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("verify_stock", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let short = {
      let guard = ctx_data.read();
      let first_short = guard
        .lines
        .iter()
        .find(|line| line.quantity > line.stock)
        .map(|line| (line.product_id, line.product_name.clone(), line.quantity, line.stock));
      first_short
    };

    if let Some((product_id, product, requested, stock)) = short {
      warn!(product_id, requested, stock, "Checkout blocked by insufficient stock.");
      return Err(AppError::InsufficientStock { product });
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("place_order", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let (new_order, db_pool) = {
      let guard = ctx_data.read();
      let delivery = guard
        .delivery
        .as_ref()
        .ok_or_else(|| AppError::Internal("Delivery details missing before placing order.".to_string()))?;
      (
        NewOrder::new(
          guard.customer_id,
          delivery.compose_address(),
          delivery.payment_method,
          guard.lines.clone(),
        )?,
        guard.app_state.db_pool.clone(),
      )
    };

    let order = db::orders::place_order(&db_pool, &new_order).await?;
    info!(order_id = order.id, customer_id = order.customer_id, "Order placed.");
    ctx_data.write().placed_order = Some(order);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register(p);
  tracing::info!("Checkout pipeline registered.");
}
