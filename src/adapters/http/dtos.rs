use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
  pub success: bool,
  pub message: String,
  pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
  pub fn ok(message: &str, data: T) -> Self {
    Self {
      success: true,
      message: message.to_string(),
      data,
    }
  }
}

/// Failure envelope, produced by [`super::errors::ApiError`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
  pub success: bool,
  pub message: String,
  pub status_code: u16,
}

// Serialize is required by the `length` check on `line_items`, which echoes
// the offending value into the validation error params.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceLineRequest {
  #[validate(length(min = 1, max = 200, message = "Description must be between 1 and 200 characters"))]
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
  #[validate(length(min = 1, max = 100, message = "Invoice number must be between 1 and 100 characters"))]
  pub invoice_number: String,

  #[validate(length(min = 1, max = 255, message = "Customer name must be between 1 and 255 characters"))]
  pub customer_name: String,

  pub currency: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub tax_rate: Decimal,

  #[validate(length(min = 1, message = "At least one line item is required"))]
  #[validate(nested)]
  pub line_items: Vec<CreateInvoiceLineRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentRequest {
  pub amount: Decimal,
  /// Defaults to the current time when omitted.
  pub payment_date: Option<DateTime<Utc>>,
}
