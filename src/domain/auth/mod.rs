pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

pub use entities::Session;
pub use errors::AuthError;
pub use ports::{SessionRepository, TokenGenerator};
pub use services::{hash_token, AuthService};
