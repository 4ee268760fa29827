// src/web/handlers/admin_handlers.rs

//! Cross-tenant reporting and moderation.

use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::auth::{Permission, RequestContext};
use crate::db;
use crate::errors::{AppError, Result};
use crate::models::{MarketStatus, ProductStatus};
use crate::services::report_export;
use crate::state::AppState;

const DEFAULT_TOP_PRODUCTS: i64 = 10;
const MAX_TOP_PRODUCTS: i64 = 100;

#[derive(Deserialize, Debug, Default)]
pub struct TopProductsQuery {
  pub limit: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct MarketStatusPayload {
  pub status: MarketStatus,
}

#[derive(Deserialize, Debug)]
pub struct ProductStatusPayload {
  pub status: ProductStatus,
}

#[instrument(name = "handler::admin_dashboard", skip_all, fields(user_id = ctx.user_id))]
pub async fn dashboard_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse> {
  ctx.authorize(Permission::ViewReports)?;
  let stats = db::reports::dashboard(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(stats))
}

#[instrument(name = "handler::sales_by_market", skip_all, fields(user_id = ctx.user_id))]
pub async fn sales_by_market_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse> {
  ctx.authorize(Permission::ViewReports)?;
  let rows = db::reports::sales_by_market(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({ "markets": rows })))
}

#[instrument(name = "handler::top_products", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn top_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<TopProductsQuery>,
  ctx: RequestContext,
) -> Result<HttpResponse> {
  ctx.authorize(Permission::ViewReports)?;
  let limit = query.limit.unwrap_or(DEFAULT_TOP_PRODUCTS);
  if !(1..=MAX_TOP_PRODUCTS).contains(&limit) {
    return Err(AppError::Validation(format!(
      "limit must be between 1 and {}.",
      MAX_TOP_PRODUCTS
    )));
  }
  let rows = db::reports::top_products(&app_state.db_pool, limit).await?;
  Ok(HttpResponse::Ok().json(json!({ "products": rows })))
}

#[instrument(name = "handler::export_report", skip_all, fields(user_id = ctx.user_id))]
pub async fn export_report_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse> {
  ctx.authorize(Permission::ViewReports)?;
  let pool = &app_state.db_pool;
  let stats = db::reports::dashboard(pool).await?;
  let sales = db::reports::sales_by_market(pool).await?;
  let top = db::reports::top_products(pool, DEFAULT_TOP_PRODUCTS).await?;

  let bytes = report_export::build_workbook(&stats, &sales, &top)?;
  info!(bytes = bytes.len(), "Report exported.");
  Ok(
    HttpResponse::Ok()
      .content_type(report_export::XLSX_CONTENT_TYPE)
      .insert_header((
        header::CONTENT_DISPOSITION,
        "attachment; filename=\"byteshop-report.xlsx\"",
      ))
      .body(bytes),
  )
}

#[instrument(name = "handler::list_users", skip_all, fields(user_id = ctx.user_id))]
pub async fn list_users_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse> {
  ctx.authorize(Permission::Moderate)?;
  let users = db::users::list_all(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

#[instrument(name = "handler::set_market_status", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn set_market_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<MarketStatusPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse> {
  ctx.authorize(Permission::Moderate)?;
  let market_id = path.into_inner();
  if !db::markets::set_status(&app_state.db_pool, market_id, payload.status).await? {
    return Err(AppError::NotFound(format!("Market {} not found.", market_id)));
  }
  info!(market_id, status = ?payload.status, "Market status changed by admin.");
  Ok(HttpResponse::Ok().json(json!({ "market_id": market_id, "status": payload.status })))
}

#[instrument(name = "handler::moderate_product_status", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn set_product_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  payload: web::Json<ProductStatusPayload>,
  ctx: RequestContext,
) -> Result<HttpResponse> {
  ctx.authorize(Permission::Moderate)?;
  let product_id = path.into_inner();
  if !db::products::set_status(&app_state.db_pool, product_id, payload.status).await? {
    return Err(AppError::NotFound(format!("Product {} not found.", product_id)));
  }
  info!(product_id, status = ?payload.status, "Product status changed by admin.");
  Ok(HttpResponse::Ok().json(json!({ "product_id": product_id, "status": payload.status })))
}
