// src/auth/permissions.rs

use crate::models::Role;
use serde::Serialize;
use std::fmt;

/// Capabilities checked by gated handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
  /// Browse-to-buy: cart and checkout.
  Shop,
  /// Own market and its catalog.
  ManageMarket,
  /// Advance order status.
  FulfilOrders,
  ViewReports,
  /// Suspend markets, deactivate products, list users.
  Moderate,
}

impl Permission {
  pub const ALL: [Permission; 5] = [
    Permission::Shop,
    Permission::ManageMarket,
    Permission::FulfilOrders,
    Permission::ViewReports,
    Permission::Moderate,
  ];
}

impl fmt::Display for Permission {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Permission::Shop => "shop",
      Permission::ManageMarket => "manage_market",
      Permission::FulfilOrders => "fulfil_orders",
      Permission::ViewReports => "view_reports",
      Permission::Moderate => "moderate",
    };
    f.write_str(name)
  }
}

impl Role {
  /// The policy table.
  pub fn allows(&self, permission: Permission) -> bool {
    use Permission::*;
    match self {
      Role::Customer => matches!(permission, Shop),
      Role::ShopOwner => matches!(permission, ManageMarket | FulfilOrders),
      Role::Admin => matches!(permission, FulfilOrders | ViewReports | Moderate),
    }
  }

  pub fn permissions(&self) -> Vec<Permission> {
    Permission::ALL.into_iter().filter(|p| self.allows(*p)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn policy_table() {
    assert_eq!(Role::Customer.permissions(), vec![Permission::Shop]);
    assert_eq!(
      Role::ShopOwner.permissions(),
      vec![Permission::ManageMarket, Permission::FulfilOrders]
    );
    assert_eq!(
      Role::Admin.permissions(),
      vec![Permission::FulfilOrders, Permission::ViewReports, Permission::Moderate]
    );
  }

  #[test]
  fn admins_do_not_shop_and_owners_do_not_moderate() {
    assert!(!Role::Admin.allows(Permission::Shop));
    assert!(!Role::ShopOwner.allows(Permission::Moderate));
    assert!(!Role::Customer.allows(Permission::FulfilOrders));
  }
}
