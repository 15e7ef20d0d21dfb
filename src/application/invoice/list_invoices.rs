use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceSummary};
use crate::domain::pagination::PaginationView;

#[derive(Debug, Default, Deserialize)]
pub struct ListInvoicesCommand {
  #[serde(default)]
  pub query: String,
  pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub id: Uuid,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_image_url: String,
  pub amount: String,
  pub date: String,
  pub status: String,
}

impl From<InvoiceSummary> for InvoiceListItemDto {
  fn from(summary: InvoiceSummary) -> Self {
    Self {
      id: summary.id,
      customer_name: summary.customer_name,
      customer_email: summary.customer_email,
      customer_image_url: summary.customer_image_url,
      amount: summary.amount.to_string(),
      date: summary.date.format("%b %-d, %Y").to_string(),
      status: summary.status.as_str().to_string(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub query: String,
  pub invoices: Vec<InvoiceListItemDto>,
  pub pagination: PaginationView,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: ListInvoicesCommand,
  ) -> Result<ListInvoicesResponse, InvoiceError> {
    let query = command.query.trim().to_string();
    let page = self
      .invoice_service
      .list_invoices(&query, command.page.unwrap_or(1))
      .await?;

    Ok(ListInvoicesResponse {
      query,
      invoices: page.invoices.into_iter().map(Into::into).collect(),
      pagination: PaginationView::new(page.current_page, page.total_pages),
    })
  }
}
