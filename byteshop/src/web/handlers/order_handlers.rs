// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use byteshop_flow::{ContextData, PipelineResult};
use serde::Deserialize;
use serde_json::json;
use tracing::{instrument, warn};

use crate::auth::{Permission, RequestContext};
use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::pipelines::contexts::StatusUpdateCtxData;
use crate::services::order_service;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct OrderListQuery {
  pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct StatusUpdateForm {
  pub order_id: i64,
  pub new_status: String,
}

#[instrument(name = "handler::list_orders", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<OrderListQuery>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    Some(raw) => Some(
      raw
        .parse::<OrderStatus>()
        .map_err(|_| AppError::Validation(format!("'{}' is not an order status.", raw)))?,
    ),
    None => None,
  };
  let orders = order_service::list_orders(&app_state.db_pool, &ctx, status).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::order_details", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn order_details_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let details = order_service::order_details(&app_state.db_pool, &ctx, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(details))
}

/// The customer's landing page after checkout.
#[instrument(name = "handler::order_confirmation", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn order_confirmation_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  let details = order_service::order_details(&app_state.db_pool, &ctx, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
    "message": "Thank you! Your order has been placed.",
    "order": details,
  })))
}

#[instrument(name = "handler::update_order_status", skip(app_state, ctx), fields(user_id = ctx.user_id))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  form: web::Form<StatusUpdateForm>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  ctx.authorize(Permission::FulfilOrders)?;
  let form = form.into_inner();

  let status_ctx = ContextData::new(StatusUpdateCtxData::new(
    app_state.get_ref().clone(),
    ctx.user_id,
    ctx.role,
    form.order_id,
    form.new_status,
  ));

  match app_state.flows.run(status_ctx.clone()).await? {
    PipelineResult::Completed => {
      let order = status_ctx
        .read()
        .updated_order
        .clone()
        .ok_or_else(|| AppError::Internal("Status update completed without an order.".to_string()))?;
      Ok(HttpResponse::Ok().json(json!({
        "message": format!("Order marked {}.", order.status),
        "available_transitions": order.status.available_transitions(),
        "order": order,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Status update pipeline was stopped by a handler.");
      Err(AppError::PipelineHaltedByHandler)
    }
  }
}
