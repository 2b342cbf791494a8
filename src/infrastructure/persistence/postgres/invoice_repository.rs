use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::invoice::{
  Currency, CustomerName, Invoice, InvoiceLine, InvoiceNumber, InvoiceStatus, TaxRate,
  ValueObjectError, errors::InvoiceError,
  ports::{InvoiceCreationUnitOfWork, InvoiceRepository},
};

pub(super) const INVOICE_COLUMNS: &str = "id, invoice_number, customer_name, currency, \
   issue_date, due_date, status, subtotal, tax_rate, tax_amount, total, \
   amount_paid, balance_due, is_archived, created_at, updated_at";

#[derive(Debug, FromRow)]
pub(super) struct InvoiceRow {
  id: Uuid,
  invoice_number: String,
  customer_name: String,
  currency: String,
  issue_date: NaiveDate,
  due_date: NaiveDate,
  status: String,
  subtotal: Decimal,
  tax_rate: Decimal,
  tax_amount: Decimal,
  total: Decimal,
  amount_paid: Decimal,
  balance_due: Decimal,
  is_archived: bool,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

// A stored row that fails domain validation is corrupt data, not bad
// client input, so it surfaces as a 500 instead of a 400.
fn corrupt_row(err: ValueObjectError) -> InvoiceError {
  InvoiceError::Internal(format!("corrupt invoice row: {err}"))
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    let invoice_number = InvoiceNumber::new(row.invoice_number).map_err(corrupt_row)?;
    let customer_name = CustomerName::new(row.customer_name).map_err(corrupt_row)?;
    let currency = Currency::from_str(&row.currency).map_err(corrupt_row)?;
    let status = InvoiceStatus::from_str(&row.status).map_err(corrupt_row)?;
    let tax_rate = TaxRate::new(row.tax_rate).map_err(corrupt_row)?;

    Ok(Invoice {
      id: row.id,
      invoice_number,
      customer_name,
      currency,
      issue_date: row.issue_date,
      due_date: row.due_date,
      status,
      subtotal: row.subtotal,
      tax_rate,
      tax_amount: row.tax_amount,
      total: row.total,
      amount_paid: row.amount_paid,
      balance_due: row.balance_due,
      is_archived: row.is_archived,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
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
  async fn begin_create(&self) -> Result<Box<dyn InvoiceCreationUnitOfWork>, InvoiceError> {
    let tx = self
      .pool
      .begin()
      .await
      .map_err(|e| InvoiceError::TransactionFailed(e.to_string()))?;

    Ok(Box::new(PostgresInvoiceCreationUnitOfWork { tx }))
  }

  async fn update(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            UPDATE invoices
            SET status = $2, amount_paid = $3, balance_due = $4,
                is_archived = $5, updated_at = $6
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
    ))
    .bind(invoice.id)
    .bind(invoice.status.as_str())
    .bind(invoice.amount_paid)
    .bind(invoice.balance_due)
    .bind(invoice.is_archived)
    .bind(invoice.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(Invoice::try_from).transpose()
  }

  async fn find_all(&self) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY created_at DESC"
    ))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(Invoice::try_from).collect()
  }
}

/// Dropping this without committing rolls the transaction back, so a failed
/// line insert takes the invoice row with it.
struct PostgresInvoiceCreationUnitOfWork {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl InvoiceCreationUnitOfWork for PostgresInvoiceCreationUnitOfWork {
  async fn insert_invoice(&mut self, invoice: &Invoice) -> Result<(), InvoiceError> {
    sqlx::query(
      r#"
            INSERT INTO invoices (
                id, invoice_number, customer_name, currency, issue_date, due_date,
                status, subtotal, tax_rate, tax_amount, total, amount_paid,
                balance_due, is_archived, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
    )
    .bind(invoice.id)
    .bind(invoice.invoice_number.value())
    .bind(invoice.customer_name.value())
    .bind(invoice.currency.as_str())
    .bind(invoice.issue_date)
    .bind(invoice.due_date)
    .bind(invoice.status.as_str())
    .bind(invoice.subtotal)
    .bind(invoice.tax_rate.value())
    .bind(invoice.tax_amount)
    .bind(invoice.total)
    .bind(invoice.amount_paid)
    .bind(invoice.balance_due)
    .bind(invoice.is_archived)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(&mut *self.tx)
    .await
    .map_err(|e| {
      if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23505")
          && db_err.constraint() == Some("invoices_invoice_number_key")
        {
          return InvoiceError::InvoiceNumberAlreadyExists(
            invoice.invoice_number.value().to_string(),
          );
        }
      }
      InvoiceError::Database(e)
    })?;

    Ok(())
  }

  async fn insert_lines(&mut self, lines: &[InvoiceLine]) -> Result<(), InvoiceError> {
    for line in lines {
      sqlx::query(
        r#"
            INSERT INTO invoice_line_items
                (id, invoice_id, description, quantity, unit_price, line_total, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
      )
      .bind(line.id)
      .bind(line.invoice_id)
      .bind(line.description.value())
      .bind(line.quantity.value())
      .bind(line.unit_price)
      .bind(line.line_total)
      .bind(line.created_at)
      .execute(&mut *self.tx)
      .await?;
    }

    Ok(())
  }

  async fn commit(self: Box<Self>) -> Result<(), InvoiceError> {
    self
      .tx
      .commit()
      .await
      .map_err(|e| InvoiceError::TransactionFailed(e.to_string()))
  }
}
