use thiserror::Error;
use uuid::Uuid;

use super::invoice_form::FieldErrors;
use crate::domain::invoice::InvoiceError;

/// What the presentation layer should do after a successful action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
  /// Navigate to the given path
  Redirect(String),
  /// Stay on the current page and show the message
  Message(String),
}

/// The invoice mutations a form can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceAction {
  Create,
  Update,
  Delete,
}

impl InvoiceAction {
  pub fn verb(&self) -> &'static str {
    match self {
      InvoiceAction::Create => "Create",
      InvoiceAction::Update => "Update",
      InvoiceAction::Delete => "Delete",
    }
  }
}

/// Why an invoice action did not complete
#[derive(Debug, Error)]
pub enum InvoiceActionError {
  #[error("Invoice form failed validation")]
  Validation(FieldErrors),

  #[error("Invoice not found: {0}")]
  NotFound(Uuid),

  #[error("Invoice store failure: {0}")]
  Store(#[source] InvoiceError),
}

impl From<InvoiceError> for InvoiceActionError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::InvoiceNotFound(id) => InvoiceActionError::NotFound(id),
      other => InvoiceActionError::Store(other),
    }
  }
}
