// src/pipelines/fulfilment_pipeline.rs

//! Order status updates by shop owners and admins. Only the transitions the
//! current status offers are accepted; cancelling leaves stock untouched.

use crate::auth::Permission;
use crate::db;
use crate::errors::AppError;
use crate::models::{OrderStatus, Role};
use crate::pipelines::contexts::StatusUpdateCtxData;
use byteshop_flow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{info, warn};

pub fn register_status_update_pipeline(flows: &Flows<AppError>) {
  let mut p = Pipeline::<StatusUpdateCtxData, AppError>::new(&[
    ("parse_status_request", false, None),
    ("load_order", false, None),
    ("authorize_fulfilment", false, None),
    ("check_transition", false, None),
    ("apply_status_update", false, None),
  ]);

  p.on("parse_status_request", |ctx_data: ContextData<StatusUpdateCtxData>| async move {
    let requested = { ctx_data.read().requested_status.trim().to_lowercase() };
    let status = requested
      .parse::<OrderStatus>()
      .map_err(|_| AppError::Validation(format!("'{}' is not an order status.", requested)))?;
    ctx_data.write().new_status = Some(status);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("load_order", |ctx_data: ContextData<StatusUpdateCtxData>| async move {
    let (order_id, db_pool) = {
      let guard = ctx_data.read();
      (guard.order_id, guard.app_state.db_pool.clone())
    };
    let order = db::orders::find_by_id(&db_pool, order_id)
      .await?
      .ok_or_else(|| AppError::NotFound(format!("Order {} not found.", order_id)))?;
    ctx_data.write().order = Some(order);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("authorize_fulfilment", |ctx_data: ContextData<StatusUpdateCtxData>| async move {
    let (actor_id, actor_role, order_id, db_pool) = {
      let guard = ctx_data.read();
      (
        guard.actor_id,
        guard.actor_role,
        guard.order_id,
        guard.app_state.db_pool.clone(),
      )
    };

    let forbidden = || AppError::Forbidden("You cannot update this order.".to_string());
    if !actor_role.allows(Permission::FulfilOrders) {
      return Err(forbidden());
    }
    if actor_role == Role::ShopOwner {
      let market = db::markets::find_by_owner(&db_pool, actor_id).await?.ok_or_else(forbidden)?;
      if !db::orders::touches_market(&db_pool, order_id, market.id).await? {
        warn!(actor_id, order_id, market_id = market.id, "Owner tried to update another market's order.");
        return Err(forbidden());
      }
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("check_transition", |ctx_data: ContextData<StatusUpdateCtxData>| async move {
    let (current, next) = {
      let guard = ctx_data.read();
      (guard.order.as_ref().map(|o| o.status), guard.new_status)
    };
    let (Some(current), Some(next)) = (current, next) else {
      return Err(AppError::Internal("Status update reached check_transition without its inputs.".to_string()));
    };

    if !current.can_transition_to(next) {
      return Err(AppError::Conflict(format!(
        "An order that is {} cannot be marked {}.",
        current, next
      )));
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  p.on("apply_status_update", |ctx_data: ContextData<StatusUpdateCtxData>| async move {
    let (order_id, next, db_pool) = {
      let guard = ctx_data.read();
      (guard.order_id, guard.new_status, guard.app_state.db_pool.clone())
    };
    let next = next.ok_or_else(|| AppError::Internal("New status missing.".to_string()))?;

    if !db::orders::update_status(&db_pool, order_id, next).await? {
      return Err(AppError::NotFound(format!("Order {} not found.", order_id)));
    }
    let updated = db::orders::find_by_id(&db_pool, order_id).await?;
    info!(order_id, status = %next, "Order status updated.");
    ctx_data.write().updated_order = updated;
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register(p);
  tracing::info!("Order status pipeline registered.");
}
