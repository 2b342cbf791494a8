use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::invoice_repository::{INVOICE_COLUMNS, InvoiceRow};
use crate::domain::invoice::{
  Invoice, Payment, errors::InvoiceError,
  ports::{LedgerStore, PaymentUnitOfWork},
};

/// Postgres-backed payment ledger.
///
/// Each unit of work is one database transaction. `find_invoice_for_update`
/// issues `SELECT ... FOR UPDATE`, so two units of work touching the same
/// invoice serialize on the row lock while other invoices are unaffected.
/// The wait for a locked row is bounded by the pool's acquire timeout.
pub struct PostgresLedgerStore {
  pool: PgPool,
}

impl PostgresLedgerStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
  async fn begin(&self) -> Result<Box<dyn PaymentUnitOfWork>, InvoiceError> {
    let tx = self
      .pool
      .begin()
      .await
      .map_err(|e| InvoiceError::TransactionFailed(e.to_string()))?;

    Ok(Box::new(PostgresPaymentUnitOfWork { tx }))
  }
}

/// Dropping this without committing rolls the transaction back, which is the
/// failure path for every business-rule rejection mid-flight.
struct PostgresPaymentUnitOfWork {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl PaymentUnitOfWork for PostgresPaymentUnitOfWork {
  async fn find_invoice_for_update(&mut self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *self.tx)
    .await?;

    row.map(Invoice::try_from).transpose()
  }

  async fn insert_payment(&mut self, payment: &Payment) -> Result<(), InvoiceError> {
    sqlx::query(
      r#"
            INSERT INTO payments (id, invoice_id, amount, payment_date, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
    )
    .bind(payment.id)
    .bind(payment.invoice_id)
    .bind(payment.amount)
    .bind(payment.payment_date)
    .bind(payment.created_at)
    .execute(&mut *self.tx)
    .await?;

    Ok(())
  }

  async fn update_invoice(&mut self, invoice: &Invoice) -> Result<(), InvoiceError> {
    sqlx::query(
      r#"
            UPDATE invoices
            SET status = $2, amount_paid = $3, balance_due = $4, updated_at = $5
            WHERE id = $1
            "#,
    )
    .bind(invoice.id)
    .bind(invoice.status.as_str())
    .bind(invoice.amount_paid)
    .bind(invoice.balance_due)
    .bind(invoice.updated_at)
    .execute(&mut *self.tx)
    .await?;

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
