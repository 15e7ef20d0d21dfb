pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Customer, CustomerSummary, Invoice, InvoiceFields, InvoiceSummary};
pub use errors::{CacheError, InvoiceError};
pub use ports::{CacheLookup, CustomerRepository, InvoiceRepository, ListingCache};
pub use services::{
  INVOICES_PATH, InvoicePage, InvoiceService, InvoiceServiceConfig, InvoiceServiceDependencies,
};
pub use value_objects::{AmountCents, CustomerId, InvoiceStatus, ValueObjectError, format_cents};
