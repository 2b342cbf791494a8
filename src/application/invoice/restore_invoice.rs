use std::sync::Arc;
use uuid::Uuid;

use super::list_invoices::InvoiceDto;
use crate::domain::invoice::{InvoiceError, InvoiceService};

pub struct RestoreInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl RestoreInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, invoice_id: Uuid) -> Result<InvoiceDto, InvoiceError> {
    let invoice = self.invoice_service.restore_invoice(invoice_id).await?;
    Ok(InvoiceDto::from_invoice(&invoice))
  }
}
