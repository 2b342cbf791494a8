use rust_decimal::Decimal;
use thiserror::Error;

use super::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("{0}")]
  NotFound(String),

  #[error("Cannot add payment to archived invoice")]
  ArchivedInvoice,

  #[error("Invoice is already fully paid")]
  AlreadySettled,

  #[error("Payment amount ({amount}) exceeds balance due ({balance_due})")]
  Overpayment {
    amount: Decimal,
    balance_due: Decimal,
  },

  #[error("Payment date cannot be in the future")]
  FutureDate,

  #[error("Invoice is not archived")]
  NotArchived,

  #[error("Invoice number '{0}' already exists")]
  InvoiceNumberAlreadyExists(String),

  /// Infrastructure-level failure of the payment unit of work. Retryable,
  /// unlike the business-rule errors above.
  #[error("Transaction failed: {0}")]
  TransactionFailed(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl InvoiceError {
  pub fn not_found() -> Self {
    InvoiceError::NotFound("Invoice not found".to_string())
  }

  pub fn invalid_id() -> Self {
    InvoiceError::NotFound("Invalid invoice ID".to_string())
  }
}
