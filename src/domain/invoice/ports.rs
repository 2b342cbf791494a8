use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Invoice, InvoiceLine, Payment};
use super::errors::InvoiceError;

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn begin_create(&self) -> Result<Box<dyn InvoiceCreationUnitOfWork>, InvoiceError>;
  async fn update(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
  /// All invoices, most recently created first. Archived invoices are
  /// included; archival is a display concern, not a filter.
  async fn find_all(&self) -> Result<Vec<Invoice>, InvoiceError>;
}

/// One atomic create-invoice unit of work.
///
/// Obtained from [`InvoiceRepository::begin_create`]. The invoice and its
/// lines land together or not at all: dropping an uncommitted unit of work
/// rolls everything back, so a failed line insert never leaves a lineless
/// invoice visible.
#[async_trait]
pub trait InvoiceCreationUnitOfWork: Send {
  async fn insert_invoice(&mut self, invoice: &Invoice) -> Result<(), InvoiceError>;
  async fn insert_lines(&mut self, lines: &[InvoiceLine]) -> Result<(), InvoiceError>;
  async fn commit(self: Box<Self>) -> Result<(), InvoiceError>;
}

#[async_trait]
pub trait InvoiceLineRepository: Send + Sync {
  /// Lines in creation order.
  async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<InvoiceLine>, InvoiceError>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
  /// Ledger entries most recent first; equal dates keep append order.
  async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<Payment>, InvoiceError>;
}

/// One atomic add-payment unit of work.
///
/// Obtained from [`LedgerStore::begin`]. `find_invoice_for_update` takes the
/// per-invoice lock, so concurrent units of work against the same invoice
/// serialize while different invoices proceed independently. Dropping an
/// uncommitted unit of work rolls everything back; no partial payment or
/// partial invoice update is ever observable.
#[async_trait]
pub trait PaymentUnitOfWork: Send {
  async fn find_invoice_for_update(&mut self, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
  async fn insert_payment(&mut self, payment: &Payment) -> Result<(), InvoiceError>;
  async fn update_invoice(&mut self, invoice: &Invoice) -> Result<(), InvoiceError>;
  async fn commit(self: Box<Self>) -> Result<(), InvoiceError>;
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
  async fn begin(&self) -> Result<Box<dyn PaymentUnitOfWork>, InvoiceError>;
}
