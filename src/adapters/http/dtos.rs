use serde::{Deserialize, Serialize};

use crate::application::invoice::{
  FieldErrors, InvoiceAction, InvoiceActionError, ListInvoicesCommand,
};

/// Body of every response produced by the error boundary
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Machine-readable error kind
  pub error: String,

  /// Message safe to show to the user
  pub message: String,
}

/// Sign-in form as posted by the login page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
  #[serde(default)]
  pub email: String,

  #[serde(default)]
  pub password: String,
}

/// `?query=&page=` of the listing pages.
///
/// `page` is kept as text: a malformed page falls back to the first page
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
  #[serde(default)]
  pub query: String,
  pub page: Option<String>,
}

impl ListingQuery {
  pub fn page(&self) -> Option<u32> {
    self
      .page
      .as_deref()
      .and_then(|raw| raw.trim().parse::<u32>().ok())
      .filter(|page| *page > 0)
  }

  /// Canonical form of the query for cache keys: parameter order, unknown
  /// parameters and malformed pages do not produce distinct renders.
  pub fn cache_variant(&self) -> String {
    let page = self.page().unwrap_or(1).to_string();
    let query = self.query.trim();
    serde_urlencoded::to_string([("query", query), ("page", page.as_str())])
      .unwrap_or_else(|_| format!("query={}&page={}", query, page))
  }

  pub fn into_command(self) -> ListInvoicesCommand {
    let page = self.page();
    ListInvoicesCommand {
      query: self.query,
      page,
    }
  }
}

/// What an invoice form shows after a failed action: per-field errors and
/// one summary message.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActionState {
  pub errors: FieldErrors,
  pub message: Option<String>,
}

impl ActionState {
  /// Maps a failed action to the message the user sees. The underlying
  /// store error is never part of it.
  pub fn from_error(action: InvoiceAction, error: &InvoiceActionError) -> Self {
    match error {
      InvoiceActionError::Validation(errors) => Self {
        errors: errors.clone(),
        message: Some(format!("Missing Fields. Failed to {} Invoice.", action.verb())),
      },
      InvoiceActionError::NotFound(_) => Self {
        errors: FieldErrors::default(),
        message: Some(format!(
          "Invoice not found. Failed to {} Invoice.",
          action.verb()
        )),
      },
      InvoiceActionError::Store(_) => Self {
        errors: FieldErrors::default(),
        message: Some(format!(
          "Database Error: Failed to {} Invoice.",
          action.verb()
        )),
      },
    }
  }
}
