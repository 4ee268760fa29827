// src/pipelines/contexts.rs

//! Data each pipeline runs over. Handlers receive these wrapped in
//! `byteshop_flow::ContextData`; inputs are set by the caller, outputs are
//! filled in by the steps.

use crate::models::{CartItem, CartLine, Order, OrderStatus, Product, Role, Session, User};
use crate::services::delivery::{DeliveryDetails, DeliveryForm};
use crate::state::AppState;

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub full_name: String,
  pub requested_role: String,
  pub role: Option<Role>,
  pub created_user: Option<User>,
}

impl SignupCtxData {
  pub fn new(app_state: AppState, email: String, password: String, full_name: String, requested_role: String) -> Self {
    Self {
      app_state,
      email,
      password,
      full_name,
      requested_role,
      role: None,
      created_user: None,
    }
  }
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub session: Option<Session>,
}

impl SigninCtxData {
  pub fn new(app_state: AppState, email: String, password: String) -> Self {
    Self {
      app_state,
      email,
      password,
      user: None,
      session: None,
    }
  }
}

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub customer_id: i64,
  pub product_id: i64,
  pub quantity: i64,
  pub product: Option<Product>,
  pub updated_cart_item: Option<CartItem>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, customer_id: i64, product_id: i64, quantity: i64) -> Self {
    Self {
      app_state,
      customer_id,
      product_id,
      quantity,
      product: None,
      updated_cart_item: None,
    }
  }
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub customer_id: i64,
  pub form: DeliveryForm,
  pub delivery: Option<DeliveryDetails>,
  pub lines: Vec<CartLine>,
  pub total_cents: i64,
  pub placed_order: Option<Order>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, customer_id: i64, form: DeliveryForm) -> Self {
    Self {
      app_state,
      customer_id,
      form,
      delivery: None,
      lines: Vec::new(),
      total_cents: 0,
      placed_order: None,
    }
  }
}

#[derive(Clone)]
pub struct StatusUpdateCtxData {
  pub app_state: AppState,
  pub actor_id: i64,
  pub actor_role: Role,
  pub order_id: i64,
  pub requested_status: String,
  pub new_status: Option<OrderStatus>,
  pub order: Option<Order>,
  pub updated_order: Option<Order>,
}

impl StatusUpdateCtxData {
  pub fn new(app_state: AppState, actor_id: i64, actor_role: Role, order_id: i64, requested_status: String) -> Self {
    Self {
      app_state,
      actor_id,
      actor_role,
      order_id,
      requested_status,
      new_status: None,
      order: None,
      updated_order: None,
    }
  }
}
