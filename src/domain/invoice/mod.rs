pub mod calculations;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Invoice, InvoiceLine, Payment};
pub use errors::InvoiceError;
pub use ports::{
  InvoiceCreationUnitOfWork, InvoiceLineRepository, InvoiceRepository, LedgerStore,
  PaymentRepository, PaymentUnitOfWork,
};
pub use services::{
  CalculatedTotals, InvoiceDetails, InvoiceService, InvoiceServiceDependencies, NewInvoiceData,
  PaymentLedgerService,
};
pub use value_objects::{
  Currency, CustomerName, InvoiceNumber, InvoiceStatus, LineItemDescription, Quantity, TaxRate,
  ValueObjectError,
};
