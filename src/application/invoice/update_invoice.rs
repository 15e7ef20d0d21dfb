use std::sync::Arc;
use uuid::Uuid;

use super::invoice_form::InvoiceForm;
use super::outcome::{ActionOutcome, InvoiceActionError};
use crate::domain::invoice::{INVOICES_PATH, InvoiceService};

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Overwrites customer, amount and status of the invoice `id`.
  ///
  /// The issue date is left untouched.
  pub async fn execute(
    &self,
    id: Uuid,
    form: InvoiceForm,
  ) -> Result<ActionOutcome, InvoiceActionError> {
    let fields = form.parse().map_err(|errors| {
      tracing::warn!(
        invoice_id = %id,
        fields = ?errors.fields().collect::<Vec<_>>(),
        "Invoice form rejected"
      );
      InvoiceActionError::Validation(errors)
    })?;

    self
      .invoice_service
      .update_invoice(id, fields)
      .await
      .map_err(|e| {
        tracing::error!(invoice_id = %id, "Failed to update invoice: {}", e);
        InvoiceActionError::from(e)
      })?;

    Ok(ActionOutcome::Redirect(INVOICES_PATH.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::invoice_form::{CUSTOMER_ID_FIELD, STATUS_FIELD};
  use crate::domain::invoice::{AmountCents, Invoice, InvoiceFields, InvoiceStatus};
  use crate::test_support::{InMemoryInvoiceStore, RecordingListingCache, invoice_service};
  use chrono::NaiveDate;

  fn form(customer_id: &str, amount: &str, status: &str) -> InvoiceForm {
    InvoiceForm {
      customer_id: customer_id.to_string(),
      amount: amount.to_string(),
      status: status.to_string(),
    }
  }

  #[tokio::test]
  async fn test_update_overwrites_fields_but_not_date() {
    let store = Arc::new(InMemoryInvoiceStore::with_customer("Evil Rabbit"));
    let cache = Arc::new(RecordingListingCache::default());
    let use_case = UpdateInvoiceUseCase::new(invoice_service(&store, &cache));

    let first = store.first_customer_id();
    let second = store.add_customer("Lee Robinson");
    let date = NaiveDate::from_ymd_opt(2022, 12, 6).unwrap();
    let invoice = Invoice::issued_on(
      InvoiceFields {
        customer_id: first,
        amount: AmountCents::new(100).unwrap(),
        status: InvoiceStatus::Pending,
      },
      date,
    );
    store.insert(invoice.clone());

    let outcome = use_case
      .execute(invoice.id, form(&second.to_string(), "12.34", "paid"))
      .await
      .unwrap();

    assert_eq!(outcome, ActionOutcome::Redirect("/dashboard/invoices".to_string()));
    let updated = &store.invoices()[0];
    assert_eq!(updated.id, invoice.id);
    assert_eq!(updated.customer_id, second);
    assert_eq!(updated.amount.value(), 1234);
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.date, date);
    assert_eq!(cache.invalidations().len(), 1);
  }

  #[tokio::test]
  async fn test_update_of_unknown_invoice_is_a_no_op() {
    let store = Arc::new(InMemoryInvoiceStore::with_customer("Evil Rabbit"));
    let cache = Arc::new(RecordingListingCache::default());
    let use_case = UpdateInvoiceUseCase::new(invoice_service(&store, &cache));

    let outcome = use_case
      .execute(
        Uuid::new_v4(),
        form(&store.first_customer_id().to_string(), "10", "paid"),
      )
      .await;

    assert!(outcome.is_ok());
    assert!(store.invoices().is_empty());
  }

  #[tokio::test]
  async fn test_invalid_form_reports_all_fields() {
    let store = Arc::new(InMemoryInvoiceStore::with_customer("Evil Rabbit"));
    let cache = Arc::new(RecordingListingCache::default());
    let use_case = UpdateInvoiceUseCase::new(invoice_service(&store, &cache));

    let result = use_case.execute(Uuid::new_v4(), form("", "5", "")).await;

    match result {
      Err(InvoiceActionError::Validation(errors)) => {
        assert!(errors.get(CUSTOMER_ID_FIELD).is_some());
        assert!(errors.get(STATUS_FIELD).is_some());
        assert_eq!(errors.fields().count(), 2);
      }
      other => panic!("expected validation error, got {:?}", other),
    }
  }
}
