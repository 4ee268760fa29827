// src/web/routes.rs

use actix_web::{web, HttpRequest};
use std::fmt::Display;

use crate::errors::AppError;
use crate::web::handlers::{
  admin_handlers, auth_handlers, cart_handlers, catalog_handlers, checkout_handlers, order_handlers, shop_handlers,
};

/// Undecodable bodies and query strings get the same JSON error envelope as
/// every other validation failure.
fn malformed_request(err: impl Display, req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(path = %req.path(), error = %err, "Rejected malformed request.");
  AppError::Validation(format!("Malformed request: {}", err)).into()
}

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .app_data(web::FormConfig::default().error_handler(|err, req| malformed_request(err, req)))
      .app_data(web::JsonConfig::default().error_handler(|err, req| malformed_request(err, req)))
      .app_data(web::QueryConfig::default().error_handler(|err, req| malformed_request(err, req)))
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      // Public catalog
      .route("/markets", web::get().to(catalog_handlers::list_markets_handler))
      .route("/markets/{market_id}", web::get().to(catalog_handlers::market_detail_handler))
      .route("/products/{product_id}", web::get().to(catalog_handlers::product_detail_handler))
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::view_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_to_cart_handler))
          .route("/items/{cart_item_id}", web::patch().to(cart_handlers::update_cart_item_handler))
          .route("/items/{cart_item_id}", web::delete().to(cart_handlers::remove_cart_item_handler)),
      )
      .service(
        web::scope("/checkout")
          .route("", web::get().to(checkout_handlers::checkout_summary_handler))
          .route("", web::post().to(checkout_handlers::place_order_handler)),
      )
      .service(
        web::scope("/orders")
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/status", web::post().to(order_handlers::update_order_status_handler))
          .route("/{order_id}", web::get().to(order_handlers::order_details_handler))
          .route(
            "/{order_id}/confirmation",
            web::get().to(order_handlers::order_confirmation_handler),
          ),
      )
      .service(
        web::scope("/shop")
          .route("/market", web::get().to(shop_handlers::get_my_market_handler))
          .route("/market", web::post().to(shop_handlers::create_my_market_handler))
          .route("/market", web::put().to(shop_handlers::update_my_market_handler))
          .route("/products", web::get().to(shop_handlers::list_my_products_handler))
          .route("/products", web::post().to(shop_handlers::create_product_handler))
          .route("/products/{product_id}", web::put().to(shop_handlers::update_product_handler))
          .route(
            "/products/{product_id}/status",
            web::post().to(shop_handlers::set_product_status_handler),
          ),
      )
      .service(
        web::scope("/admin")
          .route("/dashboard", web::get().to(admin_handlers::dashboard_handler))
          .route("/users", web::get().to(admin_handlers::list_users_handler))
          .route(
            "/reports/sales-by-market",
            web::get().to(admin_handlers::sales_by_market_handler),
          )
          .route("/reports/top-products", web::get().to(admin_handlers::top_products_handler))
          .route("/reports/export", web::get().to(admin_handlers::export_report_handler))
          .route(
            "/markets/{market_id}/status",
            web::post().to(admin_handlers::set_market_status_handler),
          )
          .route(
            "/products/{product_id}/status",
            web::post().to(admin_handlers::set_product_status_handler),
          ),
      ),
  );
}
