pub mod auth;
pub mod request_id;

pub use auth::SessionAuthMiddleware;
pub use request_id::{RequestId, RequestIdMiddleware};
