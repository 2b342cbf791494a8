use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, Payment, PaymentLedgerService};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub amount: Decimal,
  pub payment_date: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl PaymentDto {
  pub fn from_payment(payment: &Payment) -> Self {
    Self {
      id: payment.id,
      invoice_id: payment.invoice_id,
      amount: payment.amount,
      payment_date: payment.payment_date,
      created_at: payment.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ListPaymentsResponse {
  pub payments: Vec<PaymentDto>,
}

pub struct ListPaymentsUseCase {
  ledger_service: Arc<PaymentLedgerService>,
}

impl ListPaymentsUseCase {
  pub fn new(ledger_service: Arc<PaymentLedgerService>) -> Self {
    Self { ledger_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<ListPaymentsResponse, InvoiceError> {
    let payments = self.ledger_service.list_payments(invoice_id).await?;

    Ok(ListPaymentsResponse {
      payments: payments.iter().map(PaymentDto::from_payment).collect(),
    })
  }
}
