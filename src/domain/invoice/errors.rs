use super::value_objects::{CustomerId, ValueObjectError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("Customer does not exist: {0}")]
  UnknownCustomer(CustomerId),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

/// Failures of the rendered-listing cache.
///
/// Cache failures never fail a mutation: the store is the source of truth
/// and cached renders expire on their own.
#[derive(Debug, Error)]
pub enum CacheError {
  #[error("Cache backend error: {0}")]
  Backend(String),

  #[error("Cache connection timed out")]
  Timeout,
}
