// src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use byteshop_flow::Flows;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub flows: Arc<Flows<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Builds the state and registers every pipeline on a fresh registry.
  pub fn new(db_pool: SqlitePool, config: Arc<AppConfig>) -> Self {
    let flows = Arc::new(Flows::<AppError>::new());
    crate::pipelines::register_all_pipelines(&flows);
    Self { db_pool, flows, config }
  }
}
