use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  /// Unknown email, wrong password, or credentials failing the sign-in schema
  #[error("Invalid credentials provided")]
  CredentialsSignin,

  #[error("Invalid or expired session")]
  InvalidSession,

  /// The user store could not be queried while looking up the sign-in email
  #[error("Failed to fetch user.")]
  UserLookup(#[source] RepositoryError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),
}

/// The user-facing categories a sign-in attempt can fail with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInFailure {
  InvalidCredentials,
  Other,
}

impl SignInFailure {
  pub fn message(&self) -> &'static str {
    match self {
      SignInFailure::InvalidCredentials => "Invalid credentials.",
      SignInFailure::Other => "Something went wrong.",
    }
  }
}

impl AuthError {
  /// Classifies the error for the sign-in form.
  ///
  /// Returns `None` for infrastructure failures; those must reach the
  /// generic error boundary instead of being shown as a credential problem.
  pub fn sign_in_failure(&self) -> Option<SignInFailure> {
    match self {
      AuthError::CredentialsSignin => Some(SignInFailure::InvalidCredentials),
      AuthError::InvalidSession | AuthError::Hash(_) | AuthError::ValueObject(_) => {
        Some(SignInFailure::Other)
      }
      AuthError::UserLookup(_) | AuthError::Repository(_) => None,
    }
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => RepositoryError::DatabaseError(db_err.message().to_string()),
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      sqlx::Error::Io(e) => RepositoryError::ConnectionFailed(e.to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<argon2::password_hash::Error> for HashError {
  fn from(error: argon2::password_hash::Error) -> Self {
    use argon2::password_hash::Error;
    match error {
      // Hash parsing/format errors
      Error::PhcStringField | Error::PhcStringTrailingData => HashError::InvalidFormat,
      _ => HashError::VerificationFailed(error.to_string()),
    }
  }
}
