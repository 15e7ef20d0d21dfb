use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::invoice::{
  AmountCents, CustomerId, Invoice, InvoiceFields, InvoiceStatus, InvoiceSummary,
  errors::InvoiceError, ports::InvoiceRepository,
};

// Matches a row when the search term appears in the customer's name or
// email, or in the amount, date or status rendered as text
const SEARCH_FILTER: &str = r#"
            customers.name ILIKE $1 OR
            customers.email ILIKE $1 OR
            invoices.amount::text ILIKE $1 OR
            invoices.date::text ILIKE $1 OR
            invoices.status ILIKE $1
"#;

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: Uuid,
  customer_id: String,
  amount: i64,
  status: String,
  date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    Ok(Invoice {
      id: row.id,
      customer_id: CustomerId::from_str(&row.customer_id)?,
      amount: AmountCents::new(row.amount)?,
      status: InvoiceStatus::from_str(&row.status)?,
      date: row.date,
    })
  }
}

#[derive(Debug, FromRow)]
struct InvoiceSummaryRow {
  id: Uuid,
  amount: i64,
  status: String,
  date: NaiveDate,
  name: String,
  email: String,
  image_url: String,
}

impl TryFrom<InvoiceSummaryRow> for InvoiceSummary {
  type Error = InvoiceError;

  fn try_from(row: InvoiceSummaryRow) -> Result<Self, Self::Error> {
    Ok(InvoiceSummary {
      id: row.id,
      amount: AmountCents::new(row.amount)?,
      status: InvoiceStatus::from_str(&row.status)?,
      date: row.date,
      customer_name: row.name,
      customer_email: row.email,
      customer_image_url: row.image_url,
    })
  }
}

// A write naming a customer that does not exist trips the foreign key
fn write_error(error: sqlx::Error, customer_id: &CustomerId) -> InvoiceError {
  match &error {
    sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
      InvoiceError::UnknownCustomer(customer_id.clone())
    }
    _ => InvoiceError::Database(error),
  }
}

fn search_pattern(query: &str) -> String {
  format!("%{}%", query.trim())
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, amount, status, date
            "#,
    )
    .bind(invoice.id)
    .bind(invoice.customer_id.as_str())
    .bind(invoice.amount.value())
    .bind(invoice.status.as_str())
    .bind(invoice.date)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| write_error(e, &invoice.customer_id))?;

    row.try_into()
  }

  async fn update(&self, id: Uuid, fields: InvoiceFields) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
            UPDATE invoices
            SET customer_id = $2, amount = $3, status = $4
            WHERE id = $1
            "#,
    )
    .bind(id)
    .bind(fields.customer_id.as_str())
    .bind(fields.amount.value())
    .bind(fields.status.as_str())
    .execute(&self.pool)
    .await
    .map_err(|e| write_error(e, &fields.customer_id))?;

    Ok(result.rows_affected())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_filtered(
    &self,
    query: &str,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<InvoiceSummary>, InvoiceError> {
    let sql = format!(
      r#"
            SELECT invoices.id, invoices.amount, invoices.status, invoices.date,
                   customers.name, customers.email, customers.image_url
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {SEARCH_FILTER}
            ORDER BY invoices.date DESC, invoices.id
            LIMIT $2 OFFSET $3
            "#
    );

    let rows = sqlx::query_as::<_, InvoiceSummaryRow>(&sql)
      .bind(search_pattern(query))
      .bind(limit)
      .bind(offset)
      .fetch_all(&self.pool)
      .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn count_filtered(&self, query: &str) -> Result<i64, InvoiceError> {
    let sql = format!(
      r#"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {SEARCH_FILTER}
            "#
    );

    let count: i64 = sqlx::query_scalar(&sql)
      .bind(search_pattern(query))
      .fetch_one(&self.pool)
      .await?;

    Ok(count)
  }

  async fn delete(&self, id: Uuid) -> Result<u64, InvoiceError> {
    let result = sqlx::query(
      r#"
            DELETE FROM invoices
            WHERE id = $1
            "#,
    )
    .bind(id)
    .execute(&self.pool)
    .await?;

    Ok(result.rows_affected())
  }
}
