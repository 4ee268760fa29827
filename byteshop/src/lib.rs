// src/lib.rs

//! ByteShop: a multi-vendor marketplace service.
//!
//! Customers browse markets and products, fill a cart and check out; shop
//! owners run one market each and fulfil its orders; admins see reports and
//! moderate. Multi-step operations run as `byteshop_flow` pipelines.

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
