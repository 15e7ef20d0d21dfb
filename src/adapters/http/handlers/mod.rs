pub mod customers_web;
pub mod invoices_web;
pub mod pages;
pub mod web_auth;

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  domain::auth::entities::User,
};
use actix_web::{HttpMessage, HttpRequest};

/// Extract authenticated user from request extensions
pub fn get_user(req: &HttpRequest) -> Result<User, ApiError> {
  let user = req.extensions().get::<User>().cloned();

  if user.is_none() {
    tracing::warn!(
      "get_user: User not found in request extensions for path {}",
      req.path()
    );
  }

  user.ok_or(ApiError::Auth(AuthErrorKind::InvalidSession))
}
