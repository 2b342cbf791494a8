use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::adapters::http::{
  dtos::{ApiResponse, CreateInvoiceRequest},
  errors::ApiError,
};
use crate::application::invoice::{
  ArchiveInvoiceUseCase, CreateInvoiceCommand, CreateInvoiceLineDto, CreateInvoiceUseCase,
  GetInvoiceDetailsUseCase, ListInvoicesUseCase, RestoreInvoiceUseCase,
};
use crate::domain::invoice::InvoiceError;

/// Malformed ids resolve like unknown ones, so probing ids cannot
/// distinguish "bad format" from "no such invoice".
pub(super) fn parse_invoice_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| InvoiceError::invalid_id().into())
}

/// GET /api/invoices
pub async fn list_invoices_handler(
  use_case: web::Data<Arc<ListInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case.execute().await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoices retrieved successfully", response)))
}

/// POST /api/invoices
pub async fn create_invoice_handler(
  request: web::Json<CreateInvoiceRequest>,
  use_case: web::Data<Arc<CreateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = CreateInvoiceCommand {
    invoice_number: request.invoice_number,
    customer_name: request.customer_name,
    currency: request.currency,
    issue_date: request.issue_date,
    due_date: request.due_date,
    tax_rate: request.tax_rate,
    line_items: request
      .line_items
      .into_iter()
      .map(|line| CreateInvoiceLineDto {
        description: line.description,
        quantity: line.quantity,
        unit_price: line.unit_price,
      })
      .collect(),
  };

  let response = use_case.execute(command).await?;
  Ok(HttpResponse::Created().json(ApiResponse::ok("Invoice created successfully", response)))
}

/// GET /api/invoices/{id}
pub async fn get_invoice_details_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = parse_invoice_id(&path)?;
  let response = use_case.execute(invoice_id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoice retrieved successfully", response)))
}

/// POST /api/invoices/{id}/archive
pub async fn archive_invoice_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<ArchiveInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = parse_invoice_id(&path)?;
  let response = use_case.execute(invoice_id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoice archived successfully", response)))
}

/// POST /api/invoices/{id}/restore
pub async fn restore_invoice_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<RestoreInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let invoice_id = parse_invoice_id(&path)?;
  let response = use_case.execute(invoice_id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok("Invoice restored successfully", response)))
}
