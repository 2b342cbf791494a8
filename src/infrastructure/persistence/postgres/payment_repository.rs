use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::invoice::{Payment, errors::InvoiceError, ports::PaymentRepository};

#[derive(Debug, FromRow)]
struct PaymentRow {
  id: Uuid,
  invoice_id: Uuid,
  amount: Decimal,
  payment_date: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
  fn from(row: PaymentRow) -> Self {
    Payment {
      id: row.id,
      invoice_id: row.invoice_id,
      amount: row.amount,
      payment_date: row.payment_date,
      created_at: row.created_at,
    }
  }
}

pub struct PostgresPaymentRepository {
  pool: PgPool,
}

impl PostgresPaymentRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
  async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<Payment>, InvoiceError> {
    // entry_no is assigned at insert, so equal payment dates keep append order
    let rows = sqlx::query_as::<_, PaymentRow>(
      r#"
            SELECT id, invoice_id, amount, payment_date, created_at
            FROM payments
            WHERE invoice_id = $1
            ORDER BY payment_date DESC, entry_no ASC
            "#,
    )
    .bind(invoice_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Payment::from).collect())
  }
}
