//! Password hashing.
//!
//! New hashes are argon2id PHC strings with a per-user random salt. Accounts
//! imported from the browser version carry the old fixed-salt SHA-256 hex
//! digest; those still verify, and [`needs_rehash`] tells the caller to
//! replace them.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// The constant appended to every password by the browser version.
const LEGACY_SALT: &str = "cerimonial_salt";

/// Hash `password` with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check `password` against a stored hash of either format.
pub fn verify_password(password: &str, stored: &str) -> bool {
  if is_legacy(stored) {
    return legacy_digest(password) == stored.to_ascii_lowercase();
  }
  match PasswordHash::new(stored) {
    Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
    Err(_) => false,
  }
}

/// Whether a stored hash predates argon2 and should be upgraded after the
/// next successful login.
pub fn needs_rehash(stored: &str) -> bool { is_legacy(stored) }

/// `hex(sha256(password + "cerimonial_salt"))`.
pub fn legacy_digest(password: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(password.as_bytes());
  hasher.update(LEGACY_SALT.as_bytes());
  hex::encode(hasher.finalize())
}

fn is_legacy(stored: &str) -> bool {
  stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}
