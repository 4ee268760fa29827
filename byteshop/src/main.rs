// src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use byteshop::{db, web, AppConfig, AppState};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting ByteShop server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let db_pool = match db::connect(&app_config).await {
    Ok(pool) => pool,
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  if let Err(e) = db::apply_schema(&db_pool).await {
    tracing::error!(error = %e, "Failed to apply database schema.");
    return Err(std::io::Error::other(e.to_string()));
  }
  if let Err(e) = db::bootstrap_admin(&db_pool, &app_config).await {
    tracing::error!(error = %e, "Failed to bootstrap the admin account.");
    return Err(std::io::Error::other(e.to_string()));
  }

  let app_state = AppState::new(db_pool, app_config.clone());
  tracing::info!("Pipelines registered.");

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!(base_url = %app_config.app_base_url, "Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
