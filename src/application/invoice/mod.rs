pub mod create_invoice;
pub mod delete_invoice;
pub mod get_invoice;
pub mod invoice_form;
pub mod list_customers;
pub mod list_invoices;
pub mod outcome;
pub mod update_invoice;

pub use create_invoice::CreateInvoiceUseCase;
pub use delete_invoice::DeleteInvoiceUseCase;
pub use get_invoice::{EditInvoiceResponse, GetInvoiceUseCase};
pub use invoice_form::{FieldErrors, InvoiceForm};
pub use list_customers::{CustomerDto, ListCustomersResponse, ListCustomersUseCase};
pub use list_invoices::{
  InvoiceListItemDto, ListInvoicesCommand, ListInvoicesResponse, ListInvoicesUseCase,
};
pub use outcome::{ActionOutcome, InvoiceAction, InvoiceActionError};
pub use update_invoice::UpdateInvoiceUseCase;
