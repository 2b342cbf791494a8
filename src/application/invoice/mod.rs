pub mod add_payment;
pub mod archive_invoice;
pub mod create_invoice;
pub mod get_invoice_details;
pub mod list_invoices;
pub mod list_payments;
pub mod restore_invoice;

pub use add_payment::{AddPaymentCommand, AddPaymentResponse, AddPaymentUseCase};
pub use archive_invoice::ArchiveInvoiceUseCase;
pub use create_invoice::{
  CreateInvoiceCommand, CreateInvoiceLineDto, CreateInvoiceResponse, CreateInvoiceUseCase,
};
pub use get_invoice_details::{
  CalculatedTotalsDto, GetInvoiceDetailsUseCase, InvoiceDetailsResponse, InvoiceLineDto,
};
pub use list_invoices::{InvoiceDto, ListInvoicesResponse, ListInvoicesUseCase};
pub use list_payments::{ListPaymentsResponse, ListPaymentsUseCase, PaymentDto};
pub use restore_invoice::RestoreInvoiceUseCase;
