use rand::RngCore;

use crate::domain::auth::ports::TokenGenerator;

/// 32 bytes from the OS random number generator, hex encoded. 256 bits of
/// entropy makes the token unguessable; clients treat it as opaque.
pub struct SecureTokenGenerator;

impl SecureTokenGenerator {
  pub fn new() -> Self {
    Self
  }
}

impl Default for SecureTokenGenerator {
  fn default() -> Self {
    Self::new()
  }
}

impl TokenGenerator for SecureTokenGenerator {
  fn generate(&self) -> String {
    let mut token_bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut token_bytes);
    hex::encode(token_bytes)
  }
}
