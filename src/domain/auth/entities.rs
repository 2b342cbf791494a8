use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side session. Only the SHA-256 hash of the bearer token is stored;
/// the raw token exists solely in the response that issued it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id: Uuid,
  pub token_hash: String,
  pub user_email: String,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn new(token_hash: String, user_email: String, valid_for: Duration) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      token_hash,
      user_email,
      created_at: now,
      expires_at: now + valid_for,
    }
  }

  pub fn is_expired(&self) -> bool {
    self.expires_at <= Utc::now()
  }
}
