use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id password hasher.
///
/// Hashing and verification are CPU bound and run on the blocking pool so
/// they never stall the actix workers.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  // 19 MiB, 2 passes, 1 lane
  const MEMORY_COST_KIB: u32 = 19456;
  const TIME_COST: u32 = 2;
  const PARALLELISM: u32 = 1;

  pub fn new() -> Result<Self, AuthError> {
    Self::with_params(Self::MEMORY_COST_KIB, Self::TIME_COST, Self::PARALLELISM)
  }

  pub fn with_params(
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
  ) -> Result<Self, AuthError> {
    let params = Params::new(memory_kib, iterations, parallelism, Some(32)).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }
}

fn blocking_failure(e: tokio::task::JoinError) -> AuthError {
  AuthError::Hash(HashError::HashingFailed(format!(
    "Hashing task failed: {}",
    e
  )))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let argon2 = self.argon2.clone();
    let plain = password.as_str().to_owned();

    let hash = tokio::task::spawn_blocking(move || {
      let salt = SaltString::generate(&mut rand::rngs::OsRng);
      argon2
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
    })
    .await
    .map_err(blocking_failure)?
    .map_err(|e| AuthError::Hash(HashError::HashingFailed(e.to_string())))?;

    PasswordHash::from_hash(hash).map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Invalid hash format: {}",
        e
      )))
    })
  }

  /// Returns `Ok(false)` on mismatch; errors only for unusable hashes
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let argon2 = self.argon2.clone();
    let plain = password.as_str().to_owned();
    let stored = hashed_password.as_str().to_owned();

    tokio::task::spawn_blocking(move || {
      let parsed_hash = Argon2PasswordHash::new(&stored).map_err(HashError::from)?;

      // verify_password compares in constant time
      match argon2.verify_password(plain.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError::VerificationFailed(e.to_string())),
      }
    })
    .await
    .map_err(blocking_failure)?
    .map_err(AuthError::Hash)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fast_hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::with_params(1024, 1, 1).unwrap()
  }

  #[tokio::test]
  async fn test_hash_uses_argon2id() {
    let hasher = Argon2PasswordHasher::new().unwrap();
    let password = Password::new("123456").unwrap();

    let hash = hasher.hash(&password).await.unwrap();
    assert!(hash.as_str().starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
  }

  #[tokio::test]
  async fn test_verify_matching_and_wrong_password() {
    let hasher = fast_hasher();
    let password = Password::new("123456").unwrap();
    let wrong = Password::new("1234567").unwrap();

    let hash = hasher.hash(&password).await.unwrap();
    assert!(hasher.verify(&password, &hash).await.unwrap());
    assert!(!hasher.verify(&wrong, &hash).await.unwrap());
  }

  #[tokio::test]
  async fn test_hashes_are_salted() {
    let hasher = fast_hasher();
    let password = Password::new("123456").unwrap();

    let first = hasher.hash(&password).await.unwrap();
    let second = hasher.hash(&password).await.unwrap();
    assert_ne!(first.as_str(), second.as_str());
  }

  #[tokio::test]
  async fn test_hash_from_other_params_still_verifies() {
    // Hashes carry their own parameters, so stored hashes survive tuning
    let password = Password::new("123456").unwrap();
    let hash = fast_hasher().hash(&password).await.unwrap();

    let hasher = Argon2PasswordHasher::new().unwrap();
    assert!(hasher.verify(&password, &hash).await.unwrap());
  }

  #[test]
  fn test_invalid_params_are_rejected() {
    assert!(Argon2PasswordHasher::with_params(0, 0, 0).is_err());
  }
}
