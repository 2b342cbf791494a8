use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{Invoice, InvoiceError, InvoiceService};

/// Invoice as serialized over the API. All monetary fields come from the
/// stored snapshot, already rounded to the currency precision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
  pub id: Uuid,
  pub invoice_number: String,
  pub customer_name: String,
  pub currency: String,
  pub currency_symbol: String,
  pub tax_label: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: String,
  pub subtotal: Decimal,
  pub tax_rate: Decimal,
  pub tax_amount: Decimal,
  pub total: Decimal,
  pub amount_paid: Decimal,
  pub balance_due: Decimal,
  pub is_archived: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl InvoiceDto {
  pub fn from_invoice(invoice: &Invoice) -> Self {
    Self {
      id: invoice.id,
      invoice_number: invoice.invoice_number.value().to_string(),
      customer_name: invoice.customer_name.value().to_string(),
      currency: invoice.currency.as_str().to_string(),
      currency_symbol: invoice.currency.symbol().to_string(),
      tax_label: invoice.currency.tax_label().to_string(),
      issue_date: invoice.issue_date,
      due_date: invoice.due_date,
      status: invoice.status.as_str().to_string(),
      subtotal: invoice.subtotal,
      tax_rate: invoice.tax_rate.value(),
      tax_amount: invoice.tax_amount,
      total: invoice.total,
      amount_paid: invoice.amount_paid,
      balance_due: invoice.balance_due,
      is_archived: invoice.is_archived,
      created_at: invoice.created_at,
      updated_at: invoice.updated_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceDto>,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self) -> Result<ListInvoicesResponse, InvoiceError> {
    let invoices = self.invoice_service.list_invoices().await?;

    Ok(ListInvoicesResponse {
      invoices: invoices.iter().map(InvoiceDto::from_invoice).collect(),
    })
  }
}
