// src/web/handlers/shop_handlers.rs

//! A shop owner's own market and catalog.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::auth::{Permission, RequestContext};
use crate::db;
use crate::db::markets::MarketInput;
use crate::db::products::ProductInput;
use crate::errors::{AppError, Result};
use crate::models::{Market, ProductStatus};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ProductStatusPayload {
  pub status: ProductStatus,
}

async fn own_market(pool: &SqlitePool, ctx: &RequestContext) -> Result<Market> {
  ctx.authorize(Permission::ManageMarket)?;
  db::markets::find_by_owner(pool, ctx.user_id)
    .await?
    .ok_or_else(|| AppError::NotFound("You have not created a market yet.".to_string()))
}

#[instrument(name = "handler::get_my_market", skip_all, fields(user_id = ctx.user_id))]
pub async fn get_my_market_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse> {
  let market = own_market(&app_state.db_pool, &ctx).await?;
  Ok(HttpResponse::Ok().json(json!({ "market": market })))
}

#[instrument(name = "handler::create_my_market", skip_all, fields(user_id = ctx.user_id))]
pub async fn create_my_market_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<MarketInput>,
  ctx: RequestContext,
) -> Result<HttpResponse> {
  ctx.authorize(Permission::ManageMarket)?;
  payload.validate()?;

  if db::markets::find_by_owner(&app_state.db_pool, ctx.user_id).await?.is_some() {
    return Err(AppError::Conflict("You already have a market.".to_string()));
  }
  let market = db::markets::insert(&app_state.db_pool, ctx.user_id, &payload).await?;
  info!(market_id = market.id, "Market created.");
  Ok(HttpResponse::Created().json(json!({ "market": market })))
}

#[instrument(name = "handler::update_my_market", skip_all, fields(user_id = ctx.user_id))]
pub async fn update_my_market_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<MarketInput>,
  ctx: RequestContext,
) -> Result<HttpResponse> {
  let market = own_market(&app_state.db_pool, &ctx).await?;
  payload.validate()?;
  let market = db::markets::update(&app_state.db_pool, market.id, &payload).await?;
  Ok(HttpResponse::Ok().json(json!({ "market": market })))
}

#[instrument(name = "handler::list_my_products", skip_all, fields(user_id = ctx.user_id))]
pub async fn list_my_products_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse> {
  let market = own_market(&app_state.db_pool, &ctx).await?;
  let products = db::products::list_all_for_market(&app_state.db_pool, market.id).await?;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::create_product", skip_all, fields(user_id = ctx.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ProductInput>,
  ctx: RequestContext,
) -> Result<HttpResponse> {
  let market = own_market(&app_state.db_pool, &ctx).await?;
  payload.validate()?;
  let product = db::products::insert(&app_state.db_pool, market.id, &payload).await?;
  info!(product_id = product.id, market_id = market.id, "Product created.");
  Ok(HttpResponse::Created().json(json!({ "product": product })))
}

#[instrument(name = "handler::update_product", skip(app_state, payload, ctx), fields(user_id = ctx.user_id))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<ProductInput>,
  ctx: RequestContext,
) -> Result<HttpResponse> {
  let market = own_market(&app_state.db_pool, &ctx).await?;
  let product_id = path.into_inner();
  payload.validate()?;
  db::products::find_in_market(&app_state.db_pool, market.id, product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found.", product_id)))?;

  let product = db::products::update(&app_state.db_pool, product_id, &payload).await?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

#[instrument(name = "handler::set_my_product_status", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn set_product_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<ProductStatusPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse> {
  let market = own_market(&app_state.db_pool, &ctx).await?;
  let product_id = path.into_inner();
  db::products::find_in_market(&app_state.db_pool, market.id, product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found.", product_id)))?;

  db::products::set_status(&app_state.db_pool, product_id, payload.status).await?;
  Ok(HttpResponse::Ok().json(json!({ "product_id": product_id, "status": payload.status })))
}
