// src/web/handlers/catalog_handlers.rs

//! Public browsing: markets, a market's products, product detail.

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::db;
use crate::db::markets::MarketFilter;
use crate::db::products::ProductFilter;
use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_markets", skip(app_state))]
pub async fn list_markets_handler(
  app_state: web::Data<AppState>,
  query: web::Query<MarketFilter>,
) -> Result<HttpResponse, AppError> {
  let markets = db::markets::list_active(&app_state.db_pool, &query).await?;
  Ok(HttpResponse::Ok().json(json!({ "markets": markets })))
}

#[instrument(name = "handler::market_detail", skip(app_state))]
pub async fn market_detail_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  query: web::Query<ProductFilter>,
) -> Result<HttpResponse, AppError> {
  let market_id = path.into_inner();
  let market = db::markets::find_active(&app_state.db_pool, market_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Market {} not found.", market_id)))?;
  let products = db::products::list_for_market(&app_state.db_pool, market_id, &query).await?;

  Ok(HttpResponse::Ok().json(json!({
    "market": market,
    "products": products,
  })))
}

#[instrument(name = "handler::product_detail", skip(app_state))]
pub async fn product_detail_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let product = db::products::find_visible(&app_state.db_pool, product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product {} not found.", product_id)))?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}
