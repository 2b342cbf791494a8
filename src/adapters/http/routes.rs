use actix_web::web;
use std::sync::Arc;

use super::handlers::{invoices, payments};
use crate::application::invoice::{
  AddPaymentUseCase, ArchiveInvoiceUseCase, CreateInvoiceUseCase, GetInvoiceDetailsUseCase,
  ListInvoicesUseCase, ListPaymentsUseCase, RestoreInvoiceUseCase,
};

pub struct InvoiceRouteDependencies {
  pub list_invoices: Arc<ListInvoicesUseCase>,
  pub create_invoice: Arc<CreateInvoiceUseCase>,
  pub get_invoice_details: Arc<GetInvoiceDetailsUseCase>,
  pub archive_invoice: Arc<ArchiveInvoiceUseCase>,
  pub restore_invoice: Arc<RestoreInvoiceUseCase>,
  pub add_payment: Arc<AddPaymentUseCase>,
  pub list_payments: Arc<ListPaymentsUseCase>,
}

/// Mounts the invoice API under the scope this is configured in,
/// conventionally `/api/invoices`.
pub fn configure_invoice_routes(cfg: &mut web::ServiceConfig, deps: InvoiceRouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.list_invoices))
    .app_data(web::Data::new(deps.create_invoice))
    .app_data(web::Data::new(deps.get_invoice_details))
    .app_data(web::Data::new(deps.archive_invoice))
    .app_data(web::Data::new(deps.restore_invoice))
    .app_data(web::Data::new(deps.add_payment))
    .app_data(web::Data::new(deps.list_payments))
    .route("", web::get().to(invoices::list_invoices_handler))
    .route("", web::post().to(invoices::create_invoice_handler))
    .route("/{id}", web::get().to(invoices::get_invoice_details_handler))
    .route("/{id}/archive", web::post().to(invoices::archive_invoice_handler))
    .route("/{id}/restore", web::post().to(invoices::restore_invoice_handler))
    .route("/{id}/payments", web::post().to(payments::add_payment_handler))
    .route("/{id}/payments", web::get().to(payments::list_payments_handler));
}
