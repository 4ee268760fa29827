// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Fulfilment state of an order.
///
/// Forward path: placed -> packed -> shipped -> delivered. `Cancelled` can be
/// reached from any state before `Delivered`. `Delivered` and `Cancelled` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
  Placed,
  Packed,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Placed,
    OrderStatus::Packed,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Placed => "placed",
      OrderStatus::Packed => "packed",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
  }

  /// The statuses the fulfilment controls offer from this one.
  pub fn available_transitions(&self) -> &'static [OrderStatus] {
    match self {
      OrderStatus::Placed => &[OrderStatus::Packed, OrderStatus::Cancelled],
      OrderStatus::Packed => &[OrderStatus::Shipped, OrderStatus::Cancelled],
      OrderStatus::Shipped => &[OrderStatus::Delivered, OrderStatus::Cancelled],
      OrderStatus::Delivered | OrderStatus::Cancelled => &[],
    }
  }

  pub fn can_transition_to(&self, next: OrderStatus) -> bool {
    self.available_transitions().contains(&next)
  }

  /// Position on the customer-facing progress bar (1-4); 0 when cancelled.
  pub fn progress_step(&self) -> u8 {
    match self {
      OrderStatus::Placed => 1,
      OrderStatus::Packed => 2,
      OrderStatus::Shipped => 3,
      OrderStatus::Delivered => 4,
      OrderStatus::Cancelled => 0,
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| format!("unknown order status '{}'", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum PaymentMethod {
  #[serde(rename = "COD")]
  #[sqlx(rename = "COD")]
  Cod,
  #[serde(rename = "UPI")]
  #[sqlx(rename = "UPI")]
  Upi,
  Card,
}

impl PaymentMethod {
  pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cod, PaymentMethod::Upi, PaymentMethod::Card];

  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::Cod => "COD",
      PaymentMethod::Upi => "UPI",
      PaymentMethod::Card => "Card",
    }
  }
}

impl FromStr for PaymentMethod {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    PaymentMethod::ALL
      .into_iter()
      .find(|method| method.as_str() == s)
      .ok_or_else(|| format!("unsupported payment method '{}'", s))
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: i64,
  pub customer_id: i64,
  pub total_amount_cents: i64,
  pub status: OrderStatus,
  pub delivery_address: String,
  pub payment_method: PaymentMethod,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
