pub mod invoice_line_repository;
pub mod invoice_repository;
pub mod ledger_store;
pub mod payment_repository;
pub mod session_repository;

pub use invoice_line_repository::PostgresInvoiceLineRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use ledger_store::PostgresLedgerStore;
pub use payment_repository::PostgresPaymentRepository;
pub use session_repository::PostgresSessionRepository;
