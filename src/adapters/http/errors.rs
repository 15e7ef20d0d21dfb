use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::AuthError;
use crate::domain::invoice::InvoiceError;

use super::dtos::ErrorResponse;

/// Error boundary for failures no page knows how to present.
///
/// Expected outcomes (validation errors, rejected sign-ins, failed invoice
/// actions) never reach this type; handlers render them as page state.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Requested record does not exist (404 Not Found)
  NotFound(String),

  /// Authentication error (401 Unauthorized)
  Auth(AuthErrorKind),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Serialize)]
pub enum AuthErrorKind {
  /// Session expired or invalid (401)
  InvalidSession,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::NotFound(what) => write!(f, "Not found: {}", what),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Auth(AuthErrorKind::InvalidSession) => StatusCode::UNAUTHORIZED,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::NotFound(what) => ("not_found", format!("{} not found", what)),
      ApiError::Auth(AuthErrorKind::InvalidSession) => (
        "invalid_session",
        "Invalid or expired session".to_string(),
      ),
      ApiError::Internal(msg) => {
        // Detail stays in the log
        tracing::error!("Internal error: {}", msg);
        ("internal_error", "Something went wrong.".to_string())
      }
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(ErrorResponse {
        error: error_type.to_string(),
        message,
      })
  }
}

impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidSession => ApiError::Auth(AuthErrorKind::InvalidSession),
      // "Failed to fetch user." and every other unclassified failure
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::InvoiceNotFound(id) => ApiError::NotFound(format!("Invoice {}", id)),
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl From<tera::Error> for ApiError {
  fn from(error: tera::Error) -> Self {
    ApiError::Internal(format!("Template error: {:?}", error))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::RepositoryError;
  use actix_web::body::to_bytes;
  use uuid::Uuid;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::NotFound("Invoice".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidSession).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_user_lookup_failure_reaches_the_error_boundary() {
    let api_error: ApiError =
      AuthError::UserLookup(RepositoryError::ConnectionFailed("down".to_string())).into();
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let api_error: ApiError = AuthError::InvalidSession.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);
  }

  #[test]
  fn test_invoice_error_conversion() {
    let api_error: ApiError = InvoiceError::InvoiceNotFound(Uuid::new_v4()).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = InvoiceError::Database(sqlx::Error::PoolTimedOut).into();
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[actix_web::test]
  async fn test_internal_detail_is_not_exposed() {
    let response = ApiError::Internal("password column missing".to_string()).error_response();
    let body = to_bytes(response.into_body()).await.unwrap();
    let body = std::str::from_utf8(&body).unwrap();

    assert!(body.contains("Something went wrong."));
    assert!(!body.contains("password column"));
  }
}
