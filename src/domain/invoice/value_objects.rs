use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Amount must be greater than zero")]
  AmountNotPositive,
  #[error("Unknown invoice status: {0}")]
  InvalidStatus(String),
  #[error("Invalid customer id: {0}")]
  InvalidCustomerId(String),
}

// Customer identifier - opaque text chosen in the invoice form. Whether it
// names an existing customer is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl FromStr for CustomerId {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidCustomerId(s.to_string()));
    }
    Ok(CustomerId(trimmed.to_string()))
  }
}

impl From<uuid::Uuid> for CustomerId {
  fn from(id: uuid::Uuid) -> Self {
    CustomerId(id.to_string())
  }
}

impl fmt::Display for CustomerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  Pending,
  Paid,
}

impl InvoiceStatus {
  pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Pending, InvoiceStatus::Paid];

  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Pending => "pending",
      InvoiceStatus::Paid => "paid",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  /// Status values are matched exactly; the form only ever submits the
  /// lowercase names.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(InvoiceStatus::Pending),
      "paid" => Ok(InvoiceStatus::Paid),
      _ => Err(ValueObjectError::InvalidStatus(s.to_string())),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// Amount - stored in minor units (cents), entered as decimal dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountCents(i64);

impl AmountCents {
  /// Wraps a cent value read back from storage
  pub fn new(cents: i64) -> Result<Self, ValueObjectError> {
    if cents <= 0 {
      return Err(ValueObjectError::AmountNotPositive);
    }
    Ok(Self(cents))
  }

  /// Converts a dollar amount to cents, rounding half away from zero.
  ///
  /// Amounts that are not positive, or that round down to zero cents, are
  /// rejected.
  pub fn from_dollars(dollars: Decimal) -> Result<Self, ValueObjectError> {
    if dollars <= Decimal::ZERO {
      return Err(ValueObjectError::AmountNotPositive);
    }

    let cents = dollars
      .checked_mul(Decimal::ONE_HUNDRED)
      .ok_or_else(|| ValueObjectError::InvalidAmount(dollars.to_string()))?
      .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
      .to_i64()
      .ok_or_else(|| ValueObjectError::InvalidAmount(dollars.to_string()))?;

    Self::new(cents)
  }

  /// Parses a decimal dollar string as typed into the invoice form
  pub fn parse_dollars(input: &str) -> Result<Self, ValueObjectError> {
    let trimmed = input.trim();
    let dollars = Decimal::from_str(trimmed)
      .map_err(|_| ValueObjectError::InvalidAmount(trimmed.to_string()))?;
    Self::from_dollars(dollars)
  }

  pub fn value(&self) -> i64 {
    self.0
  }

  /// The amount in dollars with two decimal places
  pub fn to_dollars(&self) -> Decimal {
    Decimal::new(self.0, 2)
  }
}

impl fmt::Display for AmountCents {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "${}", self.to_dollars())
  }
}

/// Formats a cent total for display; unlike `AmountCents` it accepts zero
pub fn format_cents(cents: i64) -> String {
  format!("${}", Decimal::new(cents, 2))
}
