use chrono::Duration;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::entities::Session;
use super::errors::AuthError;
use super::ports::{SessionRepository, TokenGenerator};

const SESSION_DURATION_HOURS: i64 = 24;

/// SHA-256 hex digest of a bearer token. Sessions are looked up by this
/// hash so a database leak never exposes usable tokens.
pub fn hash_token(token: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(token.as_bytes());
  hex::encode(hasher.finalize())
}

pub struct AuthService {
  session_repo: Arc<dyn SessionRepository>,
  token_generator: Arc<dyn TokenGenerator>,
}

impl AuthService {
  pub fn new(session_repo: Arc<dyn SessionRepository>, token_generator: Arc<dyn TokenGenerator>) -> Self {
    Self {
      session_repo,
      token_generator,
    }
  }

  /// Issues a session for the given user and returns it together with the
  /// raw token. The raw token is never persisted.
  pub async fn issue_session(&self, user_email: String) -> Result<(Session, String), AuthError> {
    let token = self.token_generator.generate();
    let session = Session::new(
      hash_token(&token),
      user_email,
      Duration::hours(SESSION_DURATION_HOURS),
    );
    let created = self.session_repo.create(session).await?;
    Ok((created, token))
  }

  /// Resolves a presented token to its session, rejecting unknown and
  /// expired tokens alike.
  pub async fn validate(&self, token: &str) -> Result<Session, AuthError> {
    let session = self
      .session_repo
      .find_by_token_hash(&hash_token(token))
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
      return Err(AuthError::InvalidSession);
    }

    Ok(session)
  }

  pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
    self.session_repo.delete(&hash_token(token)).await
  }
}
