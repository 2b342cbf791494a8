use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::list_invoices::InvoiceDto;
use super::list_payments::PaymentDto;
use crate::domain::invoice::{InvoiceError, PaymentLedgerService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentCommand {
  pub invoice_id: Uuid,
  pub amount: Decimal,
  /// Defaults to the current time when omitted.
  pub payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentResponse {
  pub payment: PaymentDto,
  pub invoice: InvoiceDto,
}

pub struct AddPaymentUseCase {
  ledger_service: Arc<PaymentLedgerService>,
}

impl AddPaymentUseCase {
  pub fn new(ledger_service: Arc<PaymentLedgerService>) -> Self {
    Self { ledger_service }
  }

  pub async fn execute(&self, command: AddPaymentCommand) -> Result<AddPaymentResponse, InvoiceError> {
    let (payment, invoice) = self
      .ledger_service
      .add_payment(command.invoice_id, command.amount, command.payment_date)
      .await?;

    Ok(AddPaymentResponse {
      payment: PaymentDto::from_payment(&payment),
      invoice: InvoiceDto::from_invoice(&invoice),
    })
  }
}
