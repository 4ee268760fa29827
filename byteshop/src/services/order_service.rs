// src/services/order_service.rs

//! Scoped order reads: what each role is allowed to see of an order.

use crate::auth::{Permission, RequestContext};
use crate::db;
use crate::db::orders::OrderScope;
use crate::errors::{AppError, Result};
use crate::models::{Order, OrderItem, OrderStatus, Role};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
  pub order: Order,
  pub items: Vec<OrderItem>,
  /// 1-4 along placed/packed/shipped/delivered; 0 when cancelled.
  pub progress_step: u8,
  /// Empty unless the viewer may fulfil orders.
  pub available_transitions: Vec<OrderStatus>,
}

/// The listing scope for the caller. Shop owners without a market see nothing.
pub async fn scope_for(pool: &SqlitePool, ctx: &RequestContext) -> Result<Option<OrderScope>> {
  Ok(match ctx.role {
    Role::Customer => Some(OrderScope::Customer(ctx.user_id)),
    Role::ShopOwner => db::markets::find_by_owner(pool, ctx.user_id)
      .await?
      .map(|market| OrderScope::Market(market.id)),
    Role::Admin => Some(OrderScope::All),
  })
}

pub async fn list_orders(pool: &SqlitePool, ctx: &RequestContext, status: Option<OrderStatus>) -> Result<Vec<Order>> {
  match scope_for(pool, ctx).await? {
    Some(scope) => db::orders::list(pool, scope, status).await,
    None => Ok(Vec::new()),
  }
}

/// Orders outside the caller's scope are reported as missing.
pub async fn order_details(pool: &SqlitePool, ctx: &RequestContext, order_id: i64) -> Result<OrderDetails> {
  let not_found = || AppError::NotFound(format!("Order {} not found.", order_id));
  let order = db::orders::find_by_id(pool, order_id).await?.ok_or_else(not_found)?;

  let items = match ctx.role {
    Role::Customer if order.customer_id == ctx.user_id => db::orders::items(pool, order_id).await?,
    Role::Customer => return Err(not_found()),
    Role::ShopOwner => {
      let market = db::markets::find_by_owner(pool, ctx.user_id).await?.ok_or_else(not_found)?;
      let items = db::orders::items_for_market(pool, order_id, market.id).await?;
      if items.is_empty() {
        return Err(not_found());
      }
      items
    }
    Role::Admin => db::orders::items(pool, order_id).await?,
  };

  let available_transitions = if ctx.can(Permission::FulfilOrders) {
    order.status.available_transitions().to_vec()
  } else {
    Vec::new()
  };

  Ok(OrderDetails {
    progress_step: order.status.progress_step(),
    available_transitions,
    items,
    order,
  })
}
