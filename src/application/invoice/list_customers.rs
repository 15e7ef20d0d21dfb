use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{
  Customer, CustomerId, CustomerSummary, InvoiceError, InvoiceService, format_cents,
};

#[derive(Debug, Serialize)]
pub struct CustomerDto {
  pub id: CustomerId,
  pub name: String,
  pub email: String,
  pub image_url: String,
  pub total_invoices: i64,
  pub total_pending: String,
  pub total_paid: String,
}

impl From<CustomerSummary> for CustomerDto {
  fn from(summary: CustomerSummary) -> Self {
    Self {
      id: summary.id,
      name: summary.name,
      email: summary.email,
      image_url: summary.image_url,
      total_invoices: summary.total_invoices,
      total_pending: format_cents(summary.total_pending_cents),
      total_paid: format_cents(summary.total_paid_cents),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListCustomersResponse {
  pub query: String,
  pub customers: Vec<CustomerDto>,
}

pub struct ListCustomersUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListCustomersUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Customers matching `query` with their invoice totals
  pub async fn execute(&self, query: &str) -> Result<ListCustomersResponse, InvoiceError> {
    let query = query.trim().to_string();
    let customers = self.invoice_service.list_customer_summaries(&query).await?;

    Ok(ListCustomersResponse {
      query,
      customers: customers.into_iter().map(Into::into).collect(),
    })
  }

  /// Every customer, sorted by name, for the invoice form's customer select
  pub async fn options(&self) -> Result<Vec<Customer>, InvoiceError> {
    self.invoice_service.list_customers().await
  }
}
