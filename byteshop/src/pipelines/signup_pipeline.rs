// src/pipelines/signup_pipeline.rs

use crate::db;
use crate::errors::AppError;
use crate::models::Role;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;
use byteshop_flow::{ContextData, Flows, Pipeline, PipelineControl};
use tracing::{event, info, warn, Level};

pub fn register_signup_pipeline(flows: &Flows<AppError>) {
  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false, None),
    ("check_existing_user_signup", false, None),
    ("create_user_in_db", false, None),
  ]);

  signup_p.on("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| async move {
    let (email, password_len, full_name, requested_role) = {
      let guard = ctx_data.read();
      (
        guard.email.trim().to_lowercase(),
        guard.password.chars().count(),
        guard.full_name.trim().to_string(),
        guard.requested_role.trim().to_string(),
      )
    };

    event!(Level::DEBUG, email = %email, "Validating signup input.");
    if email.is_empty() || !email.contains('@') {
      return Err(AppError::Validation("Valid email is required.".to_string()));
    }
    if password_len < 8 {
      warn!("Password too short for signup ({} chars).", password_len);
      return Err(AppError::Validation(
        "Password must be at least 8 characters long.".to_string(),
      ));
    }
    if full_name.is_empty() {
      return Err(AppError::Validation("Full name is required.".to_string()));
    }
    let role = requested_role
      .parse::<Role>()
      .ok()
      .filter(Role::is_self_registrable)
      .ok_or_else(|| AppError::Validation("Role must be customer or shop_owner.".to_string()))?;

    {
      let mut guard = ctx_data.write();
      guard.email = email;
      guard.full_name = full_name;
      guard.role = Some(role);
    }
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  signup_p.on("check_existing_user_signup", |ctx_data: ContextData<SignupCtxData>| async move {
    let (email, db_pool) = {
      let guard = ctx_data.read();
      (guard.email.clone(), guard.app_state.db_pool.clone())
    };

    if db::users::email_exists(&db_pool, &email).await? {
      warn!("Attempt to sign up with existing email: {}", email);
      return Err(AppError::Conflict("An account with this email already exists.".to_string()));
    }
    Ok(PipelineControl::Continue)
  });

  signup_p.on("create_user_in_db", |ctx_data: ContextData<SignupCtxData>| async move {
    let (email, password, full_name, role, db_pool) = {
      let guard = ctx_data.read();
      (
        guard.email.clone(),
        guard.password.clone(),
        guard.full_name.clone(),
        guard.role,
        guard.app_state.db_pool.clone(),
      )
    };
    let role = role.ok_or_else(|| AppError::Internal("Signup role was not resolved.".to_string()))?;

    let password_hash = auth_service::hash_password(&password)?;
    let user = db::users::insert(&db_pool, &email, &password_hash, &full_name, role)
      .await
      .map_err(|e| match e {
        AppError::Sqlx(ref sqlx_err) if db::is_unique_violation(sqlx_err) => {
          AppError::Conflict("An account with this email already exists.".to_string())
        }
        other => other,
      })?;

    info!(user_id = user.id, role = %user.role, "User created.");
    ctx_data.write().created_user = Some(user);
    Ok::<_, AppError>(PipelineControl::Continue)
  });

  flows.register(signup_p);
  tracing::info!("Sign-up pipeline registered.");
}
