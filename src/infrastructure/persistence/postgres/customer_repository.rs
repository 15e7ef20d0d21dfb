use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

use crate::domain::invoice::{
  Customer, CustomerId, CustomerSummary, errors::InvoiceError, ports::CustomerRepository,
};

#[derive(Debug, FromRow)]
struct CustomerRow {
  id: String,
  name: String,
  email: String,
  image_url: String,
}

impl TryFrom<CustomerRow> for Customer {
  type Error = InvoiceError;

  fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
    Ok(Customer {
      id: CustomerId::from_str(&row.id)?,
      name: row.name,
      email: row.email,
      image_url: row.image_url,
    })
  }
}

#[derive(Debug, FromRow)]
struct CustomerSummaryRow {
  id: String,
  name: String,
  email: String,
  image_url: String,
  total_invoices: i64,
  total_pending: i64,
  total_paid: i64,
}

impl TryFrom<CustomerSummaryRow> for CustomerSummary {
  type Error = InvoiceError;

  fn try_from(row: CustomerSummaryRow) -> Result<Self, Self::Error> {
    Ok(CustomerSummary {
      id: CustomerId::from_str(&row.id)?,
      name: row.name,
      email: row.email,
      image_url: row.image_url,
      total_invoices: row.total_invoices,
      total_pending_cents: row.total_pending,
      total_paid_cents: row.total_paid,
    })
  }
}

pub struct PostgresCustomerRepository {
  pool: PgPool,
}

impl PostgresCustomerRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    let rows = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id, name, email, image_url
            FROM customers
            ORDER BY name ASC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn find_summaries(&self, query: &str) -> Result<Vec<CustomerSummary>, InvoiceError> {
    // SUM over BIGINT yields NUMERIC, cast back so it decodes as i64
    let rows = sqlx::query_as::<_, CustomerSummaryRow>(
      r#"
            SELECT
                customers.id,
                customers.name,
                customers.email,
                customers.image_url,
                COUNT(invoices.id) AS total_invoices,
                COALESCE(
                  SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0
                )::BIGINT AS total_pending,
                COALESCE(
                  SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0
                )::BIGINT AS total_paid
            FROM customers
            LEFT JOIN invoices ON customers.id = invoices.customer_id
            WHERE customers.name ILIKE $1 OR customers.email ILIKE $1
            GROUP BY customers.id, customers.name, customers.email, customers.image_url
            ORDER BY customers.name ASC
            "#,
    )
    .bind(format!("%{}%", query.trim()))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
