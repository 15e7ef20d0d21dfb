use std::sync::Arc;
use uuid::Uuid;

use super::outcome::{ActionOutcome, InvoiceActionError};
use crate::domain::invoice::InvoiceService;

pub const DELETED_MESSAGE: &str = "Deleted Invoice.";

pub struct DeleteInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Deletes the invoice `id`. Deleting an invoice that no longer exists
  /// succeeds as well.
  pub async fn execute(&self, id: Uuid) -> Result<ActionOutcome, InvoiceActionError> {
    self
      .invoice_service
      .delete_invoice(id)
      .await
      .map_err(|e| {
        tracing::error!(invoice_id = %id, "Failed to delete invoice: {}", e);
        InvoiceActionError::from(e)
      })?;

    Ok(ActionOutcome::Message(DELETED_MESSAGE.to_string()))
  }
}
