// src/pipelines/mod.rs

//! Every multi-step operation, defined as a step pipeline and registered on
//! the shared `Flows` registry at startup.

use crate::errors::AppError;
use byteshop_flow::Flows;

pub mod contexts;

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod fulfilment_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;

pub fn register_all_pipelines(flows: &Flows<AppError>) {
  tracing::info!("Registering pipelines...");

  signup_pipeline::register_signup_pipeline(flows);
  signin_pipeline::register_signin_pipeline(flows);
  cart_pipeline::register_add_to_cart_pipeline(flows);
  checkout_pipeline::register_checkout_pipeline(flows);
  fulfilment_pipeline::register_status_update_pipeline(flows);

  tracing::info!("All application pipelines registered.");
}
