// src/services/delivery.rs

//! Checkout form parsing: delivery details and payment method.

use crate::errors::{AppError, Result};
use crate::models::PaymentMethod;
use serde::Deserialize;

/// The checkout form exactly as posted. Every field is a string so that a
/// missing or malformed value becomes a validation message, not a 400.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeliveryForm {
  pub full_name: String,
  pub phone: String,
  pub address: String,
  pub city: String,
  pub state: String,
  pub pincode: String,
  pub payment_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryDetails {
  pub full_name: String,
  pub phone: String,
  pub address: String,
  pub city: String,
  pub state: String,
  pub pincode: String,
  pub payment_method: PaymentMethod,
}

fn required<'a>(value: &'a str, label: &str) -> Result<&'a str> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(AppError::Validation(format!("{} is required.", label)));
  }
  Ok(trimmed)
}

fn all_digits(value: &str, len: usize) -> bool {
  value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

impl DeliveryForm {
  /// Trims and checks every field; the first problem found is reported.
  pub fn validate(&self) -> Result<DeliveryDetails> {
    let full_name = required(&self.full_name, "Full name")?;
    let phone = required(&self.phone, "Phone")?;
    let address = required(&self.address, "Address")?;
    let city = required(&self.city, "City")?;
    let state = required(&self.state, "State")?;
    let pincode = required(&self.pincode, "Pincode")?;
    let payment_method = required(&self.payment_method, "Payment method")?;

    if !all_digits(phone, 10) {
      return Err(AppError::Validation("Phone must be exactly 10 digits.".to_string()));
    }
    if !all_digits(pincode, 6) {
      return Err(AppError::Validation("Pincode must be exactly 6 digits.".to_string()));
    }
    let payment_method = payment_method
      .parse::<PaymentMethod>()
      .map_err(|_| AppError::Validation("Payment method must be one of COD, UPI or Card.".to_string()))?;

    Ok(DeliveryDetails {
      full_name: full_name.to_string(),
      phone: phone.to_string(),
      address: address.to_string(),
      city: city.to_string(),
      state: state.to_string(),
      pincode: pincode.to_string(),
      payment_method,
    })
  }
}

impl DeliveryDetails {
  /// Single-line address stored on the order.
  pub fn compose_address(&self) -> String {
    format!(
      "{}, {}, {}, {} - {}, Phone: {}",
      self.full_name, self.address, self.city, self.state, self.pincode, self.phone
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form() -> DeliveryForm {
    DeliveryForm {
      full_name: " Asha Rao ".into(),
      phone: "9876543210".into(),
      address: "12 MG Road".into(),
      city: "Pune".into(),
      state: "MH".into(),
      pincode: "411001".into(),
      payment_method: "UPI".into(),
    }
  }

  #[test]
  fn composes_the_stored_address() {
    let details = form().validate().unwrap();
    assert_eq!(
      details.compose_address(),
      "Asha Rao, 12 MG Road, Pune, MH - 411001, Phone: 9876543210"
    );
    assert_eq!(details.payment_method, PaymentMethod::Upi);
  }

  #[test]
  fn rejects_blank_fields() {
    let mut f = form();
    f.city = "   ".into();
    assert!(matches!(f.validate(), Err(AppError::Validation(m)) if m.contains("City")));
  }

  #[test]
  fn phone_and_pincode_must_be_exact_digit_runs() {
    for phone in ["987654321", "98765432100", "98765x3210", "९८७६५४३२१०"] {
      let mut f = form();
      f.phone = phone.into();
      assert!(f.validate().is_err(), "{}", phone);
    }
    let mut f = form();
    f.pincode = "41100".into();
    assert!(f.validate().is_err());
  }

  #[test]
  fn rejects_unknown_payment_method() {
    let mut f = form();
    f.payment_method = "Bitcoin".into();
    assert!(f.validate().is_err());
  }
}
