use actix_web::{
  HttpRequest, HttpResponse,
  cookie::{Cookie, SameSite, time::Duration},
  http::header,
  web,
};
use std::sync::Arc;

use crate::adapters::http::dtos::LoginForm;
use crate::adapters::http::errors::ApiError;
use crate::adapters::http::middleware::{LOGIN_PATH, SESSION_COOKIE};
use crate::adapters::http::templates::TemplateEngine;
use crate::application::auth::{
  LoginOutcome, LoginUserCommand, LoginUserUseCase, LogoutUserUseCase,
};

/// How the session cookie is issued
#[derive(Debug, Clone, Copy)]
pub struct SessionCookieSettings {
  /// Only send the cookie over HTTPS
  pub secure: bool,
  pub max_age_seconds: i64,
}

impl SessionCookieSettings {
  fn session_cookie(&self, token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
      .path("/")
      .http_only(true)
      .secure(self.secure)
      .same_site(SameSite::Lax)
      .max_age(Duration::seconds(self.max_age_seconds))
      .finish()
  }

  fn removal_cookie(&self) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
      .path("/")
      .http_only(true)
      .secure(self.secure)
      .same_site(SameSite::Lax)
      .finish();
    cookie.make_removal();
    cookie
  }
}

/// Handle login form submission
///
/// Rejected credentials re-render the form with a message; a failing user
/// store is not a credential problem and goes to the error boundary.
pub async fn login_submit(
  form: web::Form<LoginForm>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
  templates: web::Data<TemplateEngine>,
  cookie_settings: web::Data<SessionCookieSettings>,
) -> Result<HttpResponse, ApiError> {
  let LoginForm { email, password } = form.into_inner();

  let command = LoginUserCommand {
    email: email.clone(),
    password,
  };

  match use_case.execute(command).await? {
    LoginOutcome::Authenticated(response) => {
      tracing::info!("Login successful for user_id={}", response.user_id);

      Ok(
        HttpResponse::SeeOther()
          .cookie(cookie_settings.session_cookie(response.session_token))
          .insert_header((header::LOCATION, "/dashboard"))
          .finish(),
      )
    }
    LoginOutcome::Rejected(failure) => {
      let mut context = tera::Context::new();
      context.insert("title", "Login");
      context.insert("error", failure.message());
      context.insert("email", &email);

      let html = templates.render("pages/login.html.tera", &context)?;

      Ok(
        HttpResponse::BadRequest()
          .content_type("text/html")
          .body(html),
      )
    }
  }
}

/// Handle logout: drop the session server-side and clear the cookie
pub async fn logout(
  req: HttpRequest,
  use_case: web::Data<Arc<LogoutUserUseCase>>,
  cookie_settings: web::Data<SessionCookieSettings>,
) -> Result<HttpResponse, ApiError> {
  if let Some(cookie) = req.cookie(SESSION_COOKIE) {
    use_case.execute(cookie.value().to_string()).await?;
  }

  Ok(
    HttpResponse::SeeOther()
      .cookie(cookie_settings.removal_cookie())
      .insert_header((header::LOCATION, LOGIN_PATH))
      .finish(),
  )
}
