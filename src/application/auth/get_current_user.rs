use std::sync::Arc;

use crate::domain::auth::entities::User;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Use case for resolving the user behind a session cookie
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  /// Creates a new instance of GetCurrentUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::InvalidSession` for malformed, unknown or expired
  /// tokens; repository failures are passed through
  pub async fn execute(&self, session_token: String) -> Result<User, AuthError> {
    let token = SessionToken::from_string(session_token).map_err(|_| AuthError::InvalidSession)?;
    self.auth_service.validate_session(&token).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::Credentials;
  use crate::test_support::{InMemoryUserStore, auth_service};

  #[tokio::test]
  async fn test_resolves_signed_in_user() {
    let users = Arc::new(InMemoryUserStore::with_user("user@nextmail.com", "123456").await);
    let (service, _sessions) = auth_service(users);
    let use_case = GetCurrentUserUseCase::new(service.clone());

    let credentials = Credentials::parse("user@nextmail.com", "123456").unwrap();
    let (user, _, token) = service.login(&credentials).await.unwrap();

    let current = use_case.execute(token.into_inner()).await.unwrap();
    assert_eq!(current.id, user.id);
  }

  #[tokio::test]
  async fn test_unknown_or_malformed_token_is_invalid_session() {
    let users = Arc::new(InMemoryUserStore::default());
    let (service, _sessions) = auth_service(users);
    let use_case = GetCurrentUserUseCase::new(service);

    for token in ["short".to_string(), SessionToken::generate().into_inner()] {
      assert!(matches!(
        use_case.execute(token).await,
        Err(AuthError::InvalidSession)
      ));
    }
  }
}
