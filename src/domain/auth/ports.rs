use async_trait::async_trait;

use super::entities::Session;
use super::errors::AuthError;

#[async_trait]
pub trait SessionRepository: Send + Sync {
  async fn create(&self, session: Session) -> Result<Session, AuthError>;
  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AuthError>;
  async fn delete(&self, token_hash: &str) -> Result<(), AuthError>;
  async fn delete_expired(&self) -> Result<u64, AuthError>;
}

/// Cryptographically secure random token source.
pub trait TokenGenerator: Send + Sync {
  fn generate(&self) -> String;
}
