use std::sync::Arc;
use uuid::Uuid;

use super::invoice_form::InvoiceForm;
use crate::domain::invoice::{InvoiceError, InvoiceService};

/// The stored invoice rendered as a pre-filled edit form
#[derive(Debug, Clone)]
pub struct EditInvoiceResponse {
  pub id: Uuid,
  pub form: InvoiceForm,
}

pub struct GetInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, id: Uuid) -> Result<EditInvoiceResponse, InvoiceError> {
    let invoice = self.invoice_service.get_invoice(id).await?;

    Ok(EditInvoiceResponse {
      id: invoice.id,
      form: InvoiceForm::from_invoice(&invoice),
    })
  }
}
