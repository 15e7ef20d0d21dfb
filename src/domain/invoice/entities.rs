use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{AmountCents, CustomerId, InvoiceStatus};

// Customer - read-only from the dashboard's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
  pub id: CustomerId,
  pub name: String,
  pub email: String,
  pub image_url: String,
}

// Validated, typed invoice fields coming from the invoice form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
  pub customer_id: CustomerId,
  pub amount: AmountCents,
  pub status: InvoiceStatus,
}

// Invoice - issued to a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub customer_id: CustomerId,
  pub amount: AmountCents,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
}

impl Invoice {
  /// Creates a new invoice dated today (UTC)
  pub fn new(fields: InvoiceFields) -> Self {
    Self::issued_on(fields, Utc::now().date_naive())
  }

  pub fn issued_on(fields: InvoiceFields, date: NaiveDate) -> Self {
    Self {
      id: Uuid::new_v4(),
      customer_id: fields.customer_id,
      amount: fields.amount,
      status: fields.status,
      date,
    }
  }

  /// Applies the editable fields; the id and issue date never change
  pub fn apply(&mut self, fields: InvoiceFields) {
    self.customer_id = fields.customer_id;
    self.amount = fields.amount;
    self.status = fields.status;
  }

  pub fn fields(&self) -> InvoiceFields {
    InvoiceFields {
      customer_id: self.customer_id.clone(),
      amount: self.amount,
      status: self.status,
    }
  }
}

// Row of the invoices listing, joined with its customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummary {
  pub id: Uuid,
  pub amount: AmountCents,
  pub status: InvoiceStatus,
  pub date: NaiveDate,
  pub customer_name: String,
  pub customer_email: String,
  pub customer_image_url: String,
}

// Row of the customers listing with invoice totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
  pub id: CustomerId,
  pub name: String,
  pub email: String,
  pub image_url: String,
  pub total_invoices: i64,
  pub total_pending_cents: i64,
  pub total_paid_cents: i64,
}
