// src/pipelines/cart_pipeline.rs

use crate::db;
use crate::errors::AppError;
use crate::pipelines::contexts::AddToCartCtxData;
use byteshop_flow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{info, warn};

pub fn register_add_to_cart_pipeline(flows: &Flows<AppError>) {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("fetch_product_for_cart", false, None),
    ("check_product_stock_for_cart", false, None),
    ("add_or_update_cart_item_db", false, None),
  ]);

  p.on("validate_cart_input", |ctx_data: ContextData<AddToCartCtxData>| async move {
    let quantity = { ctx_data.read().quantity };
    if quantity < 1 {
      warn!("Add to cart with invalid quantity {}.", quantity);
      return Err(AppError::Validation("Quantity must be at least 1.".to_string()));
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  // Only products customers can see may be added.
  p.on("fetch_product_for_cart", |ctx_data: ContextData<AddToCartCtxData>| async move {
    let (product_id, db_pool) = {
      let guard = ctx_data.read();
      (guard.product_id, guard.app_state.db_pool.clone())
    };

    let visible = db::products::find_visible(&db_pool, product_id)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Product {} is not available.", product_id)))?;
    ctx_data.write().product = Some(visible.product);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("check_product_stock_for_cart", |ctx_data: ContextData<AddToCartCtxData>| async move {
    let (customer_id, quantity, product, db_pool) = {
      let guard = ctx_data.read();
      (
        guard.customer_id,
        guard.quantity,
        guard.product.clone(),
        guard.app_state.db_pool.clone(),
      )
    };
    let product = product.ok_or_else(|| AppError::Internal("Product not loaded before stock check.".to_string()))?;

    let already_in_cart = db::cart::quantity_in_cart(&db_pool, customer_id, product.id).await?;
    let wanted = already_in_cart
      .checked_add(quantity)
      .ok_or_else(|| AppError::Validation("Quantity is too large.".to_string()))?;
    if wanted > product.stock {
      warn!(
        product_id = product.id,
        stock = product.stock,
        already_in_cart,
        requested = quantity,
        "Cart quantity would exceed stock."
      );
      return Err(AppError::Validation(format!(
        "Only {} of {} in stock ({} already in your cart).",
        product.stock, product.name, already_in_cart
      )));
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("add_or_update_cart_item_db", |ctx_data: ContextData<AddToCartCtxData>| async move {
    let (customer_id, product_id, quantity, db_pool) = {
      let guard = ctx_data.read();
      (
        guard.customer_id,
        guard.product_id,
        guard.quantity,
        guard.app_state.db_pool.clone(),
      )
    };

    let item = db::cart::add_quantity(&db_pool, customer_id, product_id, quantity).await?;
    info!(
      cart_item_id = item.id,
      product_id,
      quantity = item.quantity,
      "Cart item added or updated."
    );
    ctx_data.write().updated_cart_item = Some(item);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register(p);
  tracing::info!("Add to Cart pipeline registered.");
}
