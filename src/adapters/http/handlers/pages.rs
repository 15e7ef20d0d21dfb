use actix_web::{HttpResponse, http::header, web};

use crate::adapters::http::{errors::ApiError, templates::TemplateEngine};
use crate::domain::invoice::INVOICES_PATH;

/// Render login page
pub async fn login_page(templates: web::Data<TemplateEngine>) -> Result<HttpResponse, ApiError> {
  let mut context = tera::Context::new();
  context.insert("title", "Login");

  let html = templates.render("pages/login.html.tera", &context)?;

  Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// `/` goes to the dashboard; the auth middleware decides whether that
/// ends on the login page
pub async fn home_redirect() -> HttpResponse {
  HttpResponse::Found()
    .insert_header((header::LOCATION, "/dashboard"))
    .finish()
}

/// The dashboard opens on the invoices listing
pub async fn dashboard_redirect() -> HttpResponse {
  HttpResponse::Found()
    .insert_header((header::LOCATION, INVOICES_PATH))
    .finish()
}

pub async fn health_check() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}
