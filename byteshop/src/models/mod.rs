// src/models/mod.rs

//! Rows and enums mapped from the ByteShop schema.

pub mod cart_item;
pub mod market;
pub mod order;
pub mod order_item;
pub mod product;
pub mod session;
pub mod user;

pub use cart_item::{total_cents, CartItem, CartLine};
pub use market::{Market, MarketStatus};
pub use order::{Order, OrderStatus, PaymentMethod};
pub use order_item::OrderItem;
pub use product::{Product, ProductStatus, ProductWithMarket};
pub use session::Session;
pub use user::{Role, User};

/// Renders an amount of cents as a plain decimal string, e.g. `45000` -> `"450.00"`.
pub fn format_cents(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.unsigned_abs();
  format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
