use actix_web::{HttpResponse, web};
use std::sync::Arc;

use super::invoices::parse_invoice_id;
use crate::adapters::http::{
  dtos::{AddPaymentRequest, ApiResponse},
  errors::ApiError,
};
use crate::application::invoice::{AddPaymentCommand, AddPaymentUseCase, ListPaymentsUseCase};

/// POST /api/invoices/{id}/payments
pub async fn add_payment_handler(
  path: web::Path<String>,
  request: web::Json<AddPaymentRequest>,
  use_case: web::Data<Arc<AddPaymentUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = parse_invoice_id(&path)?;

  let response = use_case
    .execute(AddPaymentCommand {
      invoice_id,
      amount: request.amount,
      payment_date: request.payment_date,
    })
    .await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok("Payment added successfully", response)))
}

/// GET /api/invoices/{id}/payments
pub async fn list_payments_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<ListPaymentsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = parse_invoice_id(&path)?;
  let response = use_case.execute(invoice_id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Payments retrieved successfully", response)))
}
