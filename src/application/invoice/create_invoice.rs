use std::sync::Arc;

use super::invoice_form::InvoiceForm;
use super::outcome::{ActionOutcome, InvoiceActionError};
use crate::domain::invoice::{INVOICES_PATH, InvoiceService};

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Validates the form and inserts a new invoice dated today.
  ///
  /// Nothing is written when validation fails.
  pub async fn execute(&self, form: InvoiceForm) -> Result<ActionOutcome, InvoiceActionError> {
    let fields = form.parse().map_err(|errors| {
      tracing::warn!(fields = ?errors.fields().collect::<Vec<_>>(), "Invoice form rejected");
      InvoiceActionError::Validation(errors)
    })?;

    self
      .invoice_service
      .create_invoice(fields)
      .await
      .map_err(|e| {
        tracing::error!("Failed to create invoice: {}", e);
        InvoiceActionError::from(e)
      })?;

    Ok(ActionOutcome::Redirect(INVOICES_PATH.to_string()))
  }
}
