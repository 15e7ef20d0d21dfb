use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Customer, CustomerSummary, Invoice, InvoiceFields, InvoiceSummary};
use super::errors::{CacheError, InvoiceError};

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;
  /// Overwrites the editable fields; returns the number of rows affected
  async fn update(&self, id: Uuid, fields: InvoiceFields) -> Result<u64, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
  async fn find_filtered(
    &self,
    query: &str,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<InvoiceSummary>, InvoiceError>;
  async fn count_filtered(&self, query: &str) -> Result<i64, InvoiceError>;
  /// Removes the invoice; returns the number of rows affected
  async fn delete(&self, id: Uuid) -> Result<u64, InvoiceError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError>;
  async fn find_summaries(&self, query: &str) -> Result<Vec<CustomerSummary>, InvoiceError>;
}

/// Outcome of a cache read: the stored render, if any, and the generation
/// of the path the read observed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheLookup {
  pub body: Option<String>,
  pub generation: u64,
}

/// Cache of rendered listing pages, keyed by route path.
///
/// `variant` distinguishes renders of the same path (query string, page).
/// `invalidate` must make every variant of `path` unreachable, including
/// renders `put` later under a generation observed before the invalidation.
#[async_trait]
pub trait ListingCache: Send + Sync {
  async fn get(&self, path: &str, variant: &str) -> Result<CacheLookup, CacheError>;
  async fn put(
    &self,
    path: &str,
    variant: &str,
    generation: u64,
    body: &str,
  ) -> Result<(), CacheError>;
  async fn invalidate(&self, path: &str) -> Result<(), CacheError>;
}
