// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use byteshop_flow::{ContextData, PipelineResult};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::auth::{Permission, RequestContext};
use crate::errors::AppError;
use crate::pipelines::contexts::AddToCartCtxData;
use crate::services::cart_service;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: i64,
  #[serde(default = "one")]
  pub quantity: i64,
}

fn one() -> i64 {
  1
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
  pub quantity: i64,
}

#[instrument(name = "handler::view_cart", skip_all, fields(user_id = ctx.user_id))]
pub async fn view_cart_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, AppError> {
  ctx.authorize(Permission::Shop)?;
  let cart = cart_service::view_cart(&app_state.db_pool, ctx.user_id).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload, ctx),
  fields(user_id = ctx.user_id, product_id = req_payload.product_id, quantity = req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  ctx.authorize(Permission::Shop)?;

  let cart_ctx = ContextData::new(AddToCartCtxData::new(
    app_state.get_ref().clone(),
    ctx.user_id,
    req_payload.product_id,
    req_payload.quantity,
  ));

  match app_state.flows.run(cart_ctx.clone()).await? {
    PipelineResult::Completed => {
      let item = cart_ctx
        .read()
        .updated_cart_item
        .clone()
        .ok_or_else(|| AppError::Internal("Cart update completed without an item.".to_string()))?;
      info!(cart_item_id = item.id, "Added to cart.");
      Ok(HttpResponse::Ok().json(json!({
        "message": "Item added to cart.",
        "cart_item": item,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Add to Cart pipeline was stopped by a handler.");
      Err(AppError::PipelineHaltedByHandler)
    }
  }
}

#[instrument(name = "handler::update_cart_item", skip(app_state, payload, ctx), fields(user_id = ctx.user_id))]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<UpdateQuantityPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  ctx.authorize(Permission::Shop)?;
  let cart = cart_service::update_quantity(&app_state.db_pool, ctx.user_id, path.into_inner(), payload.quantity).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  ctx.authorize(Permission::Shop)?;
  let cart = cart_service::remove_item(&app_state.db_pool, ctx.user_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(name = "handler::clear_cart", skip_all, fields(user_id = ctx.user_id))]
pub async fn clear_cart_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, AppError> {
  ctx.authorize(Permission::Shop)?;
  let removed = cart_service::clear_cart(&app_state.db_pool, ctx.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Cart cleared.", "removed": removed })))
}
