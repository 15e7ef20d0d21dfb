use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::SessionToken;

/// Use case for logging out a user
pub struct LogoutUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutUserUseCase {
  /// Creates a new instance of LogoutUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Invalidates the session behind the cookie value.
  ///
  /// A malformed or unknown token has nothing to invalidate and succeeds.
  pub async fn execute(&self, session_token: String) -> Result<(), AuthError> {
    let Ok(token) = SessionToken::from_string(session_token) else {
      return Ok(());
    };

    self.auth_service.logout(&token).await
  }
}
