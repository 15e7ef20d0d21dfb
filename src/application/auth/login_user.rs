use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::{AuthError, SignInFailure};
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::Credentials;

/// Command for logging in a user
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

/// Response after successful user login
#[derive(Debug, Clone)]
pub struct LoginUserResponse {
  pub user_id: Uuid,
  pub email: String,
  /// Session token for the cookie; only its hash is stored
  pub session_token: String,
  pub expires_at: DateTime<Utc>,
}

/// Result of a sign-in attempt that did not hit an infrastructure failure
#[derive(Debug, Clone)]
pub enum LoginOutcome {
  Authenticated(LoginUserResponse),
  Rejected(SignInFailure),
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// Credentials failing the sign-in schema are rejected exactly like an
  /// unknown email or a wrong password.
  ///
  /// # Errors
  /// Returns `AuthError` only for failures that must not be presented as a
  /// sign-in problem, e.g. `AuthError::UserLookup`
  pub async fn execute(&self, command: LoginUserCommand) -> Result<LoginOutcome, AuthError> {
    let credentials = match Credentials::parse(command.email, command.password) {
      Ok(credentials) => credentials,
      Err(e) => {
        tracing::warn!("Sign-in rejected by schema: {}", e);
        return Ok(LoginOutcome::Rejected(SignInFailure::InvalidCredentials));
      }
    };

    match self.auth_service.login(&credentials).await {
      Ok((user, session, session_token)) => {
        tracing::info!(user_id = %user.id, "User signed in");
        Ok(LoginOutcome::Authenticated(LoginUserResponse {
          user_id: user.id,
          email: user.email,
          session_token: session_token.into_inner(),
          expires_at: session.expires_at,
        }))
      }
      Err(e) => match e.sign_in_failure() {
        Some(failure) => {
          tracing::warn!("Sign-in rejected: {}", e);
          Ok(LoginOutcome::Rejected(failure))
        }
        None => Err(e),
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{InMemoryUserStore, auth_service};

  fn command(email: &str, password: &str) -> LoginUserCommand {
    LoginUserCommand {
      email: email.to_string(),
      password: password.to_string(),
    }
  }

  fn rejection(outcome: LoginOutcome) -> SignInFailure {
    match outcome {
      LoginOutcome::Rejected(failure) => failure,
      LoginOutcome::Authenticated(_) => panic!("expected a rejected sign-in"),
    }
  }

  #[tokio::test]
  async fn test_correct_credentials_sign_in() {
    let users = Arc::new(InMemoryUserStore::with_user("user@nextmail.com", "123456").await);
    let (service, _sessions) = auth_service(users);
    let use_case = LoginUserUseCase::new(service);

    match use_case.execute(command("user@nextmail.com", "123456")).await {
      Ok(LoginOutcome::Authenticated(response)) => {
        assert_eq!(response.email, "user@nextmail.com");
        assert_eq!(response.session_token.len(), 64);
      }
      other => panic!("expected a signed-in user, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_wrong_password_does_not_reveal_the_email_exists() {
    let users = Arc::new(InMemoryUserStore::with_user("user@nextmail.com", "123456").await);
    let (service, _sessions) = auth_service(users);
    let use_case = LoginUserUseCase::new(service);

    let wrong_password = rejection(
      use_case
        .execute(command("user@nextmail.com", "not-the-password"))
        .await
        .unwrap(),
    );
    let unknown_email = rejection(
      use_case
        .execute(command("someone@nextmail.com", "not-the-password"))
        .await
        .unwrap(),
    );

    assert_eq!(wrong_password.message(), "Invalid credentials.");
    assert_eq!(wrong_password, unknown_email);
  }

  #[tokio::test]
  async fn test_schema_failures_are_invalid_credentials() {
    let users = Arc::new(InMemoryUserStore::with_user("user@nextmail.com", "123456").await);
    let (service, _sessions) = auth_service(users);
    let use_case = LoginUserUseCase::new(service);

    for (email, password) in [("user@nextmail.com", "12345"), ("not-an-email", "123456")] {
      let failure = rejection(use_case.execute(command(email, password)).await.unwrap());
      assert_eq!(failure, SignInFailure::InvalidCredentials);
    }
  }

  #[tokio::test]
  async fn test_corrupt_hash_is_something_went_wrong() {
    let users = Arc::new(InMemoryUserStore::with_raw_hash("user@nextmail.com", "$2b$10$bcrypt"));
    let (service, _sessions) = auth_service(users);
    let use_case = LoginUserUseCase::new(service);

    let failure = rejection(
      use_case
        .execute(command("user@nextmail.com", "123456"))
        .await
        .unwrap(),
    );
    assert_eq!(failure.message(), "Something went wrong.");
  }

  #[tokio::test]
  async fn test_unavailable_user_store_propagates() {
    let users = Arc::new(InMemoryUserStore::unavailable());
    let (service, _sessions) = auth_service(users);
    let use_case = LoginUserUseCase::new(service);

    let error = use_case
      .execute(command("user@nextmail.com", "123456"))
      .await
      .unwrap_err();
    assert_eq!(error.to_string(), "Failed to fetch user.");
  }
}
