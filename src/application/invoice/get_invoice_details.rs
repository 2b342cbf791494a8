use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::list_invoices::InvoiceDto;
use super::list_payments::PaymentDto;
use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineDto {
  pub id: Uuid,
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
  pub line_total: Decimal,
}

/// Totals recomputed from the ledger, served next to the stored snapshot so
/// clients can detect drift.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedTotalsDto {
  pub total: Decimal,
  pub amount_paid: Decimal,
  pub balance_due: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailsResponse {
  #[serde(flatten)]
  pub invoice: InvoiceDto,
  pub line_items: Vec<InvoiceLineDto>,
  pub payments: Vec<PaymentDto>,
  pub calculated: CalculatedTotalsDto,
}

pub struct GetInvoiceDetailsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let details = self.invoice_service.get_invoice_details(invoice_id).await?;

    Ok(InvoiceDetailsResponse {
      invoice: InvoiceDto::from_invoice(&details.invoice),
      line_items: details
        .line_items
        .iter()
        .map(|line| InvoiceLineDto {
          id: line.id,
          description: line.description.value().to_string(),
          quantity: line.quantity.value(),
          unit_price: line.unit_price,
          line_total: line.line_total,
        })
        .collect(),
      payments: details.payments.iter().map(PaymentDto::from_payment).collect(),
      calculated: CalculatedTotalsDto {
        total: details.calculated.total,
        amount_paid: details.calculated.amount_paid,
        balance_due: details.calculated.balance_due,
      },
    })
  }
}
