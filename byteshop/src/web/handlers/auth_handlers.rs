// src/web/handlers/auth_handlers.rs

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use byteshop_flow::{ContextData, PipelineResult};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::auth::{RequestContext, SESSION_COOKIE};
use crate::db;
use crate::errors::AppError;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
  pub full_name: String,
  #[serde(default = "default_role")]
  pub role: String,
}

fn default_role() -> String {
  "customer".to_string()
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::signup", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx = ContextData::new(SignupCtxData::new(
    app_state.get_ref().clone(),
    payload.email,
    payload.password,
    payload.full_name,
    payload.role,
  ));

  match app_state.flows.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let user = ctx
        .read()
        .created_user
        .clone()
        .ok_or_else(|| AppError::Internal("Signup completed without creating a user.".to_string()))?;
      info!(user_id = user.id, "Signup successful.");
      Ok(HttpResponse::Created().json(json!({
        "message": "Account created. Please sign in.",
        "user": user,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Signup pipeline was stopped by a handler.");
      Err(AppError::PipelineHaltedByHandler)
    }
  }
}

#[instrument(name = "handler::signin", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx = ContextData::new(SigninCtxData::new(
    app_state.get_ref().clone(),
    payload.email,
    payload.password,
  ));

  match app_state.flows.run(ctx.clone()).await? {
    PipelineResult::Completed => {
      let (user, session) = {
        let guard = ctx.read();
        (guard.user.clone(), guard.session.clone())
      };
      let (user, session) = user
        .zip(session)
        .ok_or_else(|| AppError::Internal("Signin completed without a session.".to_string()))?;

      let cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(app_state.config.session_ttl_hours))
        .finish();

      info!(user_id = user.id, "Signin successful.");
      Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Signed in.",
        "token": session.token,
        "expires_at": session.expires_at,
        "user": user,
      })))
    }
    PipelineResult::Stopped => {
      warn!("Signin pipeline was stopped by a handler.");
      Err(AppError::Auth("Authentication process was unexpectedly halted.".to_string()))
    }
  }
}

#[instrument(name = "handler::signout", skip_all, fields(user_id = ctx.user_id))]
pub async fn signout_handler(app_state: web::Data<AppState>, ctx: RequestContext) -> Result<HttpResponse, AppError> {
  db::sessions::delete(&app_state.db_pool, &ctx.session_token).await?;

  let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
  removal.make_removal();
  Ok(HttpResponse::Ok().cookie(removal).json(json!({ "message": "Signed out." })))
}

pub async fn me_handler(ctx: RequestContext) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({
    "user": ctx,
    "permissions": ctx.role.permissions(),
  })))
}
