use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use super::get_user;
use crate::adapters::http::dtos::ListingQuery;
use crate::adapters::http::{errors::ApiError, templates::TemplateEngine};
use crate::application::invoice::ListCustomersUseCase;

// GET /dashboard/customers - Customers with their invoice totals
pub async fn customers_page(
  req: HttpRequest,
  query: web::Query<ListingQuery>,
  templates: web::Data<TemplateEngine>,
  list_customers_use_case: web::Data<Arc<ListCustomersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;

  let response = list_customers_use_case.execute(&query.query).await?;

  let mut context = tera::Context::new();
  context.insert("title", "Customers");
  context.insert("user", &user);
  context.insert("query", &response.query);
  context.insert("customers", &response.customers);

  let html = templates.render("pages/customers.html.tera", &context)?;

  Ok(HttpResponse::Ok().content_type("text/html").body(html))
}
