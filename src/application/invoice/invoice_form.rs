use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::invoice::{AmountCents, CustomerId, Invoice, InvoiceFields, InvoiceStatus};

pub const CUSTOMER_ID_FIELD: &str = "customerId";
pub const AMOUNT_FIELD: &str = "amount";
pub const STATUS_FIELD: &str = "status";

const CUSTOMER_MESSAGE: &str = "Please select a customer.";
const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
const STATUS_MESSAGE: &str = "Please select an invoice status.";

fn rejected(code: &'static str, message: &'static str) -> ValidationError {
  ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_customer_id(value: &str) -> Result<(), ValidationError> {
  CustomerId::from_str(value)
    .map(|_| ())
    .map_err(|_| rejected("customer_id", CUSTOMER_MESSAGE))
}

fn validate_amount(value: &str) -> Result<(), ValidationError> {
  AmountCents::parse_dollars(value)
    .map(|_| ())
    .map_err(|_| rejected("amount", AMOUNT_MESSAGE))
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
  InvoiceStatus::from_str(value)
    .map(|_| ())
    .map_err(|_| rejected("status", STATUS_MESSAGE))
}

/// The invoice form as submitted. Every field may be missing; missing
/// fields deserialize to empty strings and fail validation like blank ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct InvoiceForm {
  #[serde(rename = "customerId", default)]
  #[validate(custom(function = "validate_customer_id"))]
  pub customer_id: String,

  #[serde(default)]
  #[validate(custom(function = "validate_amount"))]
  pub amount: String,

  #[serde(default)]
  #[validate(custom(function = "validate_status"))]
  pub status: String,
}

impl InvoiceForm {
  /// Pre-fills the edit form from a stored invoice
  pub fn from_invoice(invoice: &Invoice) -> Self {
    Self {
      customer_id: invoice.customer_id.to_string(),
      amount: invoice.amount.to_dollars().to_string(),
      status: invoice.status.as_str().to_string(),
    }
  }

  /// Validates every field and converts the form into typed invoice fields.
  ///
  /// All failing fields are reported together.
  pub fn parse(&self) -> Result<InvoiceFields, FieldErrors> {
    self.validate()?;

    let customer_id = CustomerId::from_str(&self.customer_id)
      .map_err(|_| FieldErrors::single(CUSTOMER_ID_FIELD, CUSTOMER_MESSAGE))?;
    let amount = AmountCents::parse_dollars(&self.amount)
      .map_err(|_| FieldErrors::single(AMOUNT_FIELD, AMOUNT_MESSAGE))?;
    let status = InvoiceStatus::from_str(&self.status)
      .map_err(|_| FieldErrors::single(STATUS_FIELD, STATUS_MESSAGE))?;

    Ok(InvoiceFields {
      customer_id,
      amount,
      status,
    })
  }
}

/// Per-field validation messages keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn single(field: &str, message: &str) -> Self {
    let mut errors = Self::default();
    errors.push(field, message);
    errors
  }

  pub fn push(&mut self, field: &str, message: &str) {
    self
      .0
      .entry(field.to_string())
      .or_default()
      .push(message.to_string());
  }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}

// Struct field names to the names used by the HTML form
fn form_field_name(field: &str) -> &str {
  match field {
    "customer_id" => CUSTOMER_ID_FIELD,
    other => other,
  }
}

impl From<ValidationErrors> for FieldErrors {
  fn from(errors: ValidationErrors) -> Self {
    let mut field_errors = FieldErrors::default();
    for (field, failures) in errors.field_errors() {
      for failure in failures.iter() {
        let message = failure
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| failure.code.to_string());
        field_errors.push(form_field_name(&field), &message);
      }
    }
    field_errors
  }
}
