// src/pipelines/signin_pipeline.rs

use crate::db;
use crate::errors::AppError;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use byteshop_flow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{event, warn, Level};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

pub fn register_signin_pipeline(flows: &Flows<AppError>) {
  let mut signin_p = Pipeline::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false, None),
    ("fetch_user_by_email_signin", false, None),
    ("verify_user_password_signin", false, None),
    ("issue_session_signin", false, None),
  ]);

  signin_p.on("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| async move {
    let (email, password_is_empty) = {
      let guard = ctx_data.read();
      (guard.email.trim().to_lowercase(), guard.password.is_empty())
    };
    if email.is_empty() || !email.contains('@') {
      return Err(AppError::Validation("Valid email is required.".to_string()));
    }
    if password_is_empty {
      return Err(AppError::Validation("Password is required.".to_string()));
    }
    ctx_data.write().email = email;
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  signin_p.on("fetch_user_by_email_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (email, db_pool) = {
      let guard = ctx_data.read();
      (guard.email.clone(), guard.app_state.db_pool.clone())
    };

    match db::users::find_by_email(&db_pool, &email).await? {
      Some(user) => {
        event!(Level::DEBUG, user_id = user.id, "User found for signin.");
        ctx_data.write().user = Some(user);
        Ok(PipelineControl::Continue)
      }
      None => {
        warn!("Sign-in for unknown email.");
        Err(AppError::Auth(INVALID_CREDENTIALS.to_string()))
      }
    }
  });

  signin_p.on("verify_user_password_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (stored_hash, password, user_id) = {
      let guard = ctx_data.read();
      (
        guard.user.as_ref().map(|u| u.password_hash.clone()),
        guard.password.clone(),
        guard.user.as_ref().map(|u| u.id),
      )
    };
    let stored_hash =
      stored_hash.ok_or_else(|| AppError::Internal("User missing before password check.".to_string()))?;

    if auth_service::verify_password(&stored_hash, &password)? {
      Ok(PipelineControl::Continue)
    } else {
      warn!(user_id = ?user_id, "Password mismatch on sign-in.");
      Err(AppError::Auth(INVALID_CREDENTIALS.to_string()))
    }
  });

  signin_p.on("issue_session_signin", |ctx_data: ContextData<SigninCtxData>| async move {
    let (user_id, db_pool, ttl_hours) = {
      let guard = ctx_data.read();
      (
        guard.user.as_ref().map(|u| u.id),
        guard.app_state.db_pool.clone(),
        guard.app_state.config.session_ttl_hours,
      )
    };
    let user_id = user_id.ok_or_else(|| AppError::Internal("User missing before session issue.".to_string()))?;

    db::sessions::delete_expired_for_user(&db_pool, user_id).await?;
    let session = db::sessions::create(&db_pool, user_id, ttl_hours).await?;
    event!(Level::INFO, user_id, expires_at = %session.expires_at, "Session issued.");
    ctx_data.write().session = Some(session);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register(signin_p);
  tracing::info!("Sign-in pipeline registered.");
}
