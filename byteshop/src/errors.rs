// src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use byteshop_flow::FlowError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Your cart is empty")]
  EmptyCart,

  #[error("Insufficient stock for {product}")]
  InsufficientStock { product: String },

  /// Order placement failed for a reason the customer cannot fix; the whole
  /// transaction was rolled back and resubmitting is safe.
  #[error("Failed to place order, please try again")]
  OrderFailed,

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Report Export Error: {0}")]
  Export(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  /// A pipeline returned `Stopped` where the handler needed it to complete.
  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    let err = match err.downcast::<AppError>() {
      Ok(app_err) => return app_err,
      Err(err) => err,
    };
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(err) => AppError::Internal(err.to_string()),
    }
  }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
  fn from(err: rust_xlsxwriter::XlsxError) -> Self {
    AppError::Export(err.to_string())
  }
}

impl AppError {
  /// Machine-readable reason sent alongside the message.
  pub fn code(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "validation",
      AppError::Auth(_) => "unauthenticated",
      AppError::Forbidden(_) => "forbidden",
      AppError::NotFound(_) => "not_found",
      AppError::Conflict(_) | AppError::PipelineHaltedByHandler => "conflict",
      AppError::EmptyCart => "empty_cart",
      AppError::InsufficientStock { .. } => "insufficient_stock",
      AppError::OrderFailed => "order_failed",
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Export(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => "internal",
    }
  }

  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m)
      | AppError::Auth(m)
      | AppError::Forbidden(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m) => m.clone(),
      AppError::EmptyCart | AppError::InsufficientStock { .. } | AppError::OrderFailed => self.to_string(),
      AppError::PipelineHaltedByHandler => "Process halted by business logic.".to_string(),
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Export(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => "An internal error occurred".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_)
      | AppError::EmptyCart
      | AppError::InsufficientStock { .. }
      | AppError::PipelineHaltedByHandler => StatusCode::CONFLICT,
      AppError::OrderFailed
      | AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Export(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, code = self.code(), "Responding with error");
    } else {
      tracing::warn!(application_error = %self, code = self.code(), "Responding with error");
    }

    let mut body = json!({ "error": self.public_message(), "code": self.code() });
    if let AppError::InsufficientStock { product } = self {
      body["product"] = json!(product);
    }
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
