// tests/common/mod.rs
#![allow(dead_code)]

use byteshop::auth::RequestContext;
use byteshop::db;
use byteshop::db::markets::MarketInput;
use byteshop::db::products::ProductInput;
use byteshop::errors::AppError;
use byteshop::models::{Market, Order, Product, Role, User};
use byteshop::pipelines::contexts::{AddToCartCtxData, CheckoutCtxData, StatusUpdateCtxData};
use byteshop::services::auth_service;
use byteshop::services::delivery::DeliveryForm;
use byteshop::{AppConfig, AppState};
use byteshop_flow::{ContextData, PipelineResult};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::Level;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// A fresh in-memory database with the schema applied and all pipelines registered.
pub async fn test_state() -> AppState {
  setup_tracing();
  let pool = db::connect_in_memory().await.expect("in-memory pool");
  db::apply_schema(&pool).await.expect("schema");
  AppState::new(pool, Arc::new(AppConfig::for_database("sqlite::memory:")))
}

pub async fn create_user(state: &AppState, email: &str, role: Role) -> User {
  let hash = auth_service::hash_password(TEST_PASSWORD).expect("hash");
  db::users::insert(&state.db_pool, email, &hash, "Test User", role)
    .await
    .expect("insert user")
}

pub async fn create_market(state: &AppState, owner: &User, name: &str) -> Market {
  let input = MarketInput {
    name: name.to_string(),
    description: Some(format!("{} description", name)),
    city: "Pune".to_string(),
    category: "Electronics".to_string(),
    image_url: None,
  };
  db::markets::insert(&state.db_pool, owner.id, &input)
    .await
    .expect("insert market")
}

pub async fn create_product(state: &AppState, market: &Market, name: &str, price_cents: i64, stock: i64) -> Product {
  let input = ProductInput {
    name: name.to_string(),
    description: None,
    price_cents,
    stock,
    category: "Accessories".to_string(),
    image_url: None,
  };
  db::products::insert(&state.db_pool, market.id, &input)
    .await
    .expect("insert product")
}

pub async fn product_stock(state: &AppState, product_id: i64) -> i64 {
  db::products::find_by_id(&state.db_pool, product_id)
    .await
    .expect("product lookup")
    .expect("product exists")
    .stock
}

/// A request context as the extractor would build it for `user`.
pub fn context_for(user: &User) -> RequestContext {
  RequestContext {
    user_id: user.id,
    email: user.email.clone(),
    full_name: user.full_name.clone(),
    role: user.role,
    session_token: String::new(),
  }
}

pub fn valid_delivery_form() -> DeliveryForm {
  DeliveryForm {
    full_name: "Asha Rao".to_string(),
    phone: "9876543210".to_string(),
    address: "12 MG Road".to_string(),
    city: "Pune".to_string(),
    state: "Maharashtra".to_string(),
    pincode: "411001".to_string(),
    payment_method: "COD".to_string(),
  }
}

pub async fn add_to_cart(state: &AppState, customer_id: i64, product_id: i64, quantity: i64) -> Result<(), AppError> {
  let ctx = ContextData::new(AddToCartCtxData::new(state.clone(), customer_id, product_id, quantity));
  state.flows.run(ctx).await.map(|_| ())
}

pub async fn checkout(state: &AppState, customer_id: i64, form: DeliveryForm) -> Result<Order, AppError> {
  let ctx = ContextData::new(CheckoutCtxData::new(state.clone(), customer_id, form));
  match state.flows.run(ctx.clone()).await? {
    PipelineResult::Completed => Ok(ctx.read().placed_order.clone().expect("placed order")),
    PipelineResult::Stopped => Err(AppError::OrderFailed),
  }
}

pub async fn update_status(state: &AppState, actor: &User, order_id: i64, status: &str) -> Result<Order, AppError> {
  let ctx = ContextData::new(StatusUpdateCtxData::new(
    state.clone(),
    actor.id,
    actor.role,
    order_id,
    status.to_string(),
  ));
  state.flows.run(ctx.clone()).await?;
  let updated = ctx.read().updated_order.clone();
  Ok(updated.expect("updated order"))
}

/// One customer, one shop owner with a market, two products.
pub struct Marketplace {
  pub state: AppState,
  pub customer: User,
  pub owner: User,
  pub market: Market,
  pub headphones: Product,
  pub cable: Product,
}

pub async fn marketplace() -> Marketplace {
  let state = test_state().await;
  let customer = create_user(&state, "customer@example.com", Role::Customer).await;
  let owner = create_user(&state, "owner@example.com", Role::ShopOwner).await;
  let market = create_market(&state, &owner, "Gadget Bazaar").await;
  let headphones = create_product(&state, &market, "Headphones", 150_000, 5).await;
  let cable = create_product(&state, &market, "USB Cable", 25_000, 10).await;
  Marketplace {
    state,
    customer,
    owner,
    market,
    headphones,
    cable,
  }
}
