use chrono::Duration;
use std::sync::Arc;

use async_trait::async_trait;

use super::entities::{Session, User};
use super::errors::{AuthError, HashError};
use super::ports::{CredentialVerifier, PasswordHasher, SessionRepository, UserRepository};
use super::value_objects::{Credentials, PasswordHash, SessionToken};

const DEFAULT_SESSION_TTL_SECONDS: i64 = 60 * 60 * 24;

/// Verifies credentials against the users table and a stored password hash
pub struct PasswordCredentialVerifier {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
}

impl PasswordCredentialVerifier {
  pub fn new(user_repo: Arc<dyn UserRepository>, password_hasher: Arc<dyn PasswordHasher>) -> Self {
    Self {
      user_repo,
      password_hasher,
    }
  }
}

#[async_trait]
impl CredentialVerifier for PasswordCredentialVerifier {
  async fn verify(&self, credentials: &Credentials) -> Result<User, AuthError> {
    let user = self
      .user_repo
      .find_by_email(&credentials.email)
      .await
      .map_err(|e| {
        tracing::error!("Failed to fetch user: {}", e);
        AuthError::UserLookup(e)
      })?;

    // Unknown email and wrong password are indistinguishable to the caller
    let Some(user) = user else {
      return Err(AuthError::CredentialsSignin);
    };

    let password_hash = PasswordHash::from_hash(user.password_hash.as_str()).map_err(|e| {
      tracing::error!(user_id = %user.id, "Stored password hash is unusable: {}", e);
      AuthError::Hash(HashError::InvalidFormat)
    })?;

    if self
      .password_hasher
      .verify(&credentials.password, &password_hash)
      .await?
    {
      Ok(user)
    } else {
      Err(AuthError::CredentialsSignin)
    }
  }
}

/// Session settings for the authentication service
#[derive(Debug, Clone, Copy)]
pub struct AuthServiceConfig {
  pub session_ttl_seconds: i64,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
    }
  }
}

/// Authentication service: sign-in, sign-out and session validation
pub struct AuthService {
  verifier: Arc<dyn CredentialVerifier>,
  user_repo: Arc<dyn UserRepository>,
  session_repo: Arc<dyn SessionRepository>,
  config: AuthServiceConfig,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    verifier: Arc<dyn CredentialVerifier>,
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      verifier,
      user_repo,
      session_repo,
      config,
    }
  }

  /// Authenticates a user and creates a new session
  ///
  /// # Returns
  /// A tuple containing (User, Session, SessionToken) on success
  ///
  /// # Errors
  /// Returns `AuthError::CredentialsSignin` for a rejected email/password
  /// pair, `AuthError::UserLookup` when the user store is unreachable
  pub async fn login(
    &self,
    credentials: &Credentials,
  ) -> Result<(User, Session, SessionToken), AuthError> {
    let user = self.verifier.verify(credentials).await?;

    let session_token = SessionToken::generate();
    let session = Session::with_duration(
      user.id,
      session_token.hash().into_inner(),
      Duration::seconds(self.config.session_ttl_seconds),
    );

    let created_session = self.session_repo.create(session).await?;

    Ok((user, created_session, session_token))
  }

  /// Logs out by deleting the session behind `token`; unknown tokens are ignored
  pub async fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
    let token_hash = token.hash();

    if let Some(session) = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
    {
      self.session_repo.delete(session.id).await?;
    }

    Ok(())
  }

  /// Validates a session token and returns the associated user
  ///
  /// # Errors
  /// Returns `AuthError::InvalidSession` if session is unknown, expired, or
  /// its user no longer exists
  pub async fn validate_session(&self, token: &SessionToken) -> Result<User, AuthError> {
    let token_hash = token.hash();

    let session = self
      .session_repo
      .find_by_token_hash(token_hash.as_str())
      .await?
      .ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
      self.session_repo.delete(session.id).await?;
      return Err(AuthError::InvalidSession);
    }

    self
      .user_repo
      .find_by_id(session.user_id)
      .await?
      .ok_or(AuthError::InvalidSession)
  }
}
