// src/web/handlers/checkout_handlers.rs

use actix_web::{http::header, web, HttpResponse};
use byteshop_flow::{ContextData, PipelineResult};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::auth::{Permission, RequestContext};
use crate::db;
use crate::errors::AppError;
use crate::models::{total_cents, PaymentMethod};
use crate::pipelines::contexts::CheckoutCtxData;
use crate::services::delivery::DeliveryForm;
use crate::state::AppState;

/// What a checkout submitted now would order.
#[instrument(name = "handler::checkout_summary", skip_all, fields(user_id = ctx.user_id))]
pub async fn checkout_summary_handler(
  app_state: web::Data<AppState>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  ctx.authorize(Permission::Shop)?;
  let lines = db::cart::active_lines(&app_state.db_pool, ctx.user_id).await?;
  if lines.is_empty() {
    return Err(AppError::EmptyCart);
  }
  let total_cents = total_cents(&lines)?;
  Ok(HttpResponse::Ok().json(json!({
    "lines": lines,
    "total_cents": total_cents,
    "payment_methods": PaymentMethod::ALL.iter().map(PaymentMethod::as_str).collect::<Vec<_>>(),
  })))
}

/// Places the order and redirects to its confirmation.
#[instrument(name = "handler::place_order", skip_all, fields(user_id = ctx.user_id))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  form: web::Form<DeliveryForm>,
  ctx: RequestContext,
) -> Result<HttpResponse, AppError> {
  ctx.authorize(Permission::Shop)?;

  let checkout_ctx = ContextData::new(CheckoutCtxData::new(
    app_state.get_ref().clone(),
    ctx.user_id,
    form.into_inner(),
  ));

  match app_state.flows.run(checkout_ctx.clone()).await? {
    PipelineResult::Completed => {
      let order = checkout_ctx
        .read()
        .placed_order
        .clone()
        .ok_or_else(|| AppError::Internal("Checkout completed without an order.".to_string()))?;
      info!(order_id = order.id, "Checkout completed.");
      Ok(
        HttpResponse::SeeOther()
          .insert_header((header::LOCATION, format!("/api/v1/orders/{}/confirmation", order.id)))
          .finish(),
      )
    }
    PipelineResult::Stopped => {
      warn!("Checkout pipeline was stopped by a handler.");
      Err(AppError::OrderFailed)
    }
  }
}
