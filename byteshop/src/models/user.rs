// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
  Customer,
  ShopOwner,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Customer => "customer",
      Role::ShopOwner => "shop_owner",
      Role::Admin => "admin",
    }
  }

  /// Admin accounts are only ever bootstrapped from configuration.
  pub fn is_self_registrable(&self) -> bool {
    !matches!(self, Role::Admin)
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "customer" => Ok(Role::Customer),
      "shop_owner" => Ok(Role::ShopOwner),
      "admin" => Ok(Role::Admin),
      other => Err(format!("unknown role '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: i64,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub full_name: String,
  pub role: Role,
  pub created_at: DateTime<Utc>,
}
