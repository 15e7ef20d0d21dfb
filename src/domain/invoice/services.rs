use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Customer, CustomerSummary, Invoice, InvoiceFields, InvoiceSummary};
use super::errors::InvoiceError;
use super::ports::{CustomerRepository, InvoiceRepository, ListingCache};

/// Route whose rendered listing must be refreshed after every mutation
pub const INVOICES_PATH: &str = "/dashboard/invoices";

const DEFAULT_ITEMS_PER_PAGE: u32 = 6;

/// Behaviour switches for the invoice service
#[derive(Debug, Clone, Copy)]
pub struct InvoiceServiceConfig {
  /// Treat an update that matched no row as `InvoiceNotFound`
  pub report_missing_on_update: bool,
  pub items_per_page: u32,
}

impl Default for InvoiceServiceConfig {
  fn default() -> Self {
    Self {
      report_missing_on_update: false,
      items_per_page: DEFAULT_ITEMS_PER_PAGE,
    }
  }
}

pub struct InvoiceServiceDependencies {
  pub invoice_repo: Arc<dyn InvoiceRepository>,
  pub customer_repo: Arc<dyn CustomerRepository>,
  pub listing_cache: Arc<dyn ListingCache>,
}

/// One page of the filtered invoices listing
#[derive(Debug, Clone)]
pub struct InvoicePage {
  pub invoices: Vec<InvoiceSummary>,
  pub current_page: u32,
  pub total_pages: u32,
}

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  customer_repo: Arc<dyn CustomerRepository>,
  listing_cache: Arc<dyn ListingCache>,
  config: InvoiceServiceConfig,
}

impl InvoiceService {
  pub fn new(deps: InvoiceServiceDependencies, config: InvoiceServiceConfig) -> Self {
    Self {
      invoice_repo: deps.invoice_repo,
      customer_repo: deps.customer_repo,
      listing_cache: deps.listing_cache,
      config,
    }
  }

  // Invoice mutations

  pub async fn create_invoice(&self, fields: InvoiceFields) -> Result<Invoice, InvoiceError> {
    let invoice = self.invoice_repo.create(Invoice::new(fields)).await?;
    tracing::info!(invoice_id = %invoice.id, "Invoice created");

    self.invalidate_listing().await;
    Ok(invoice)
  }

  pub async fn update_invoice(&self, id: Uuid, fields: InvoiceFields) -> Result<(), InvoiceError> {
    let affected = self.invoice_repo.update(id, fields).await?;

    if affected == 0 {
      if self.config.report_missing_on_update {
        return Err(InvoiceError::InvoiceNotFound(id));
      }
      tracing::debug!(invoice_id = %id, "Update matched no invoice");
    } else {
      tracing::info!(invoice_id = %id, "Invoice updated");
    }

    self.invalidate_listing().await;
    Ok(())
  }

  /// Deletes an invoice; deleting an unknown id is not an error
  pub async fn delete_invoice(&self, id: Uuid) -> Result<(), InvoiceError> {
    let affected = self.invoice_repo.delete(id).await?;
    tracing::info!(invoice_id = %id, affected, "Invoice deleted");

    self.invalidate_listing().await;
    Ok(())
  }

  // Queries

  pub async fn get_invoice(&self, id: Uuid) -> Result<Invoice, InvoiceError> {
    self
      .invoice_repo
      .find_by_id(id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(id))
  }

  /// Lists one page of invoices matching `query`.
  ///
  /// `page` is clamped into the valid range so a stale page link after
  /// deletions still shows the last page instead of an empty one.
  pub async fn list_invoices(&self, query: &str, page: u32) -> Result<InvoicePage, InvoiceError> {
    let per_page = self.config.items_per_page.max(1);
    let total = self.invoice_repo.count_filtered(query).await?;
    let total_pages = total_pages(total, per_page);
    let current_page = page.clamp(1, total_pages.max(1));

    let offset = i64::from(current_page - 1) * i64::from(per_page);
    let invoices = self
      .invoice_repo
      .find_filtered(query, i64::from(per_page), offset)
      .await?;

    Ok(InvoicePage {
      invoices,
      current_page,
      total_pages,
    })
  }

  pub async fn list_customers(&self) -> Result<Vec<Customer>, InvoiceError> {
    self.customer_repo.find_all().await
  }

  pub async fn list_customer_summaries(
    &self,
    query: &str,
  ) -> Result<Vec<CustomerSummary>, InvoiceError> {
    self.customer_repo.find_summaries(query).await
  }

  // Helper methods

  async fn invalidate_listing(&self) {
    if let Err(e) = self.listing_cache.invalidate(INVOICES_PATH).await {
      tracing::warn!("Failed to invalidate {} listing: {}", INVOICES_PATH, e);
    }
  }
}

fn total_pages(total_items: i64, per_page: u32) -> u32 {
  let per_page = i64::from(per_page);
  let pages = (total_items.max(0) + per_page - 1) / per_page;
  u32::try_from(pages).unwrap_or(u32::MAX)
}
