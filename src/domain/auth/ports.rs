use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Session, User};
use super::errors::{AuthError, RepositoryError};
use super::value_objects::{Credentials, Email, Password, PasswordHash};

/// Read access to dashboard users
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

  /// Finds a user by email address, ignoring the case of the stored address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;
}

/// Repository trait for session persistence operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
  /// Creates a new session in the repository
  async fn create(&self, session: Session) -> Result<Session, RepositoryError>;

  /// Finds a session by its token hash
  async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, RepositoryError>;

  /// Deletes a specific session
  async fn delete(&self, session_id: Uuid) -> Result<(), RepositoryError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}

/// Pluggable credential check used by the sign-in flow.
///
/// Implementations return the matching user, `AuthError::CredentialsSignin`
/// for a rejected pair, or another classified or unclassified error.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
  async fn verify(&self, credentials: &Credentials) -> Result<User, AuthError>;
}
