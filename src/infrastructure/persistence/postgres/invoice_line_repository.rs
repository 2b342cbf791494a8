use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::invoice::{
  InvoiceLine, LineItemDescription, Quantity, ValueObjectError, errors::InvoiceError,
  ports::InvoiceLineRepository,
};

#[derive(Debug, FromRow)]
struct InvoiceLineRow {
  id: Uuid,
  invoice_id: Uuid,
  description: String,
  quantity: Decimal,
  unit_price: Decimal,
  line_total: Decimal,
  created_at: DateTime<Utc>,
}

fn corrupt_row(err: ValueObjectError) -> InvoiceError {
  InvoiceError::Internal(format!("corrupt invoice line row: {err}"))
}

impl TryFrom<InvoiceLineRow> for InvoiceLine {
  type Error = InvoiceError;

  fn try_from(row: InvoiceLineRow) -> Result<Self, Self::Error> {
    let description = LineItemDescription::new(row.description).map_err(corrupt_row)?;
    let quantity = Quantity::new(row.quantity).map_err(corrupt_row)?;

    Ok(InvoiceLine {
      id: row.id,
      invoice_id: row.invoice_id,
      description,
      quantity,
      unit_price: row.unit_price,
      line_total: row.line_total,
      created_at: row.created_at,
    })
  }
}

pub struct PostgresInvoiceLineRepository {
  pool: PgPool,
}

impl PostgresInvoiceLineRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceLineRepository for PostgresInvoiceLineRepository {
  async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<InvoiceLine>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceLineRow>(
      r#"
            SELECT id, invoice_id, description, quantity, unit_price, line_total, created_at
            FROM invoice_line_items
            WHERE invoice_id = $1
            ORDER BY line_no ASC
            "#,
    )
    .bind(invoice_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(InvoiceLine::try_from).collect()
  }
}
