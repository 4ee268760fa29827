// src/services/mod.rs

pub mod auth_service;
pub mod cart_service;
pub mod delivery;
pub mod order_service;
pub mod report_export;
