// src/auth/request_context.rs

use crate::auth::Permission;
use crate::db;
use crate::errors::{AppError, Result};
use crate::models::Role;
use crate::state::AppState;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

pub const SESSION_COOKIE: &str = "byteshop_session";

/// The authenticated caller of one request.
///
/// Resolved from `Authorization: Bearer <token>` or the session cookie and
/// handed to every gated handler; there is no ambient session state.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
  pub user_id: i64,
  pub email: String,
  pub full_name: String,
  pub role: Role,
  #[serde(skip_serializing)]
  pub session_token: String,
}

impl RequestContext {
  /// Looks the token up; unknown and expired sessions are both 401.
  pub async fn resolve(pool: &SqlitePool, token: &str) -> Result<Self> {
    let identity = db::sessions::find_identity(pool, token)
      .await?
      .ok_or_else(|| AppError::Auth("Session is invalid or has ended. Please sign in.".to_string()))?;

    if identity.expires_at <= Utc::now() {
      debug!(user_id = identity.user_id, "Session expired.");
      return Err(AppError::Auth("Session has expired. Please sign in.".to_string()));
    }

    Ok(Self {
      user_id: identity.user_id,
      email: identity.email,
      full_name: identity.full_name,
      role: identity.role,
      session_token: token.to_string(),
    })
  }

  pub fn can(&self, permission: Permission) -> bool {
    self.role.allows(permission)
  }

  pub fn authorize(&self, permission: Permission) -> Result<()> {
    if self.can(permission) {
      return Ok(());
    }
    warn!(user_id = self.user_id, role = %self.role, permission = %permission, "Permission denied.");
    Err(AppError::Forbidden(format!(
      "Your account ({}) is not allowed to do this.",
      self.role
    )))
  }
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
  let bearer = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(|token| token.trim().to_string())
    .filter(|token| !token.is_empty());

  bearer.or_else(|| {
    req
      .cookie(SESSION_COOKIE)
      .map(|c| c.value().to_string())
      .filter(|token| !token.is_empty())
  })
}

impl FromRequest for RequestContext {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = token_from_request(req);

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let token = token.ok_or_else(|| AppError::Auth("Please sign in to continue.".to_string()))?;
      RequestContext::resolve(&state.db_pool, &token).await
    })
  }
}
