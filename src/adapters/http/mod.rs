pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use dtos::{AddPaymentRequest, ApiResponse, CreateInvoiceRequest, ErrorResponse};
pub use errors::ApiError;
pub use middleware::{RequestId, RequestIdMiddleware, SessionAuthMiddleware};
pub use routes::{InvoiceRouteDependencies, configure_invoice_routes};
