use actix_web::{
  HttpRequest, HttpResponse,
  http::{StatusCode, header},
  web,
};
use std::sync::Arc;
use uuid::Uuid;

use super::get_user;
use crate::adapters::http::dtos::{ActionState, ListingQuery};
use crate::adapters::http::errors::ApiError;
use crate::adapters::http::middleware::RequestIdExt;
use crate::adapters::http::templates::TemplateEngine;
use crate::application::invoice::{
  ActionOutcome, CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, InvoiceAction,
  InvoiceActionError, InvoiceForm, ListCustomersUseCase, ListInvoicesUseCase, UpdateInvoiceUseCase,
};
use crate::domain::auth::entities::User;
use crate::domain::invoice::{CacheLookup, INVOICES_PATH, InvoiceStatus, ListingCache};

/// htmx event fired after a delete so the listing reloads itself
const INVOICES_CHANGED_EVENT: &str = "invoices-changed";

fn html(status: StatusCode, body: String) -> HttpResponse {
  HttpResponse::build(status)
    .content_type("text/html")
    .body(body)
}

fn outcome_response(outcome: ActionOutcome) -> HttpResponse {
  match outcome {
    ActionOutcome::Redirect(path) => HttpResponse::SeeOther()
      .insert_header((header::LOCATION, path))
      .finish(),
    ActionOutcome::Message(message) => HttpResponse::Ok()
      .content_type("text/html")
      .body(message),
  }
}

fn action_status(error: &InvoiceActionError) -> StatusCode {
  match error {
    InvoiceActionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    InvoiceActionError::NotFound(_) => StatusCode::NOT_FOUND,
    InvoiceActionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

/// Renders the table and pagination of one listing variant
async fn render_listing(
  templates: &TemplateEngine,
  list_invoices: &ListInvoicesUseCase,
  query: ListingQuery,
) -> Result<String, ApiError> {
  let response = list_invoices.execute(query.into_command()).await?;

  let mut context = tera::Context::new();
  context.insert("query", &response.query);
  context.insert("invoices", &response.invoices);
  context.insert("pagination", &response.pagination);

  Ok(templates.render("partials/invoices_table.html.tera", &context)?)
}

// GET /dashboard/invoices - Paginated, searchable invoices listing
pub async fn invoices_page(
  req: HttpRequest,
  query: web::Query<ListingQuery>,
  templates: web::Data<TemplateEngine>,
  list_invoices: web::Data<Arc<ListInvoicesUseCase>>,
  listing_cache: web::Data<Arc<dyn ListingCache>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;
  let query = query.into_inner();
  let variant = query.cache_variant();

  // Only the user-independent part of the page is cached
  let lookup = match listing_cache.get(INVOICES_PATH, &variant).await {
    Ok(lookup) => Some(lookup),
    Err(e) => {
      tracing::warn!(request_id = ?req.request_id(), "Listing cache read failed: {}", e);
      None
    }
  };

  let table = match lookup {
    Some(CacheLookup {
      body: Some(table), ..
    }) => {
      tracing::debug!(variant = %variant, "Serving invoices listing from cache");
      table
    }
    Some(CacheLookup {
      body: None,
      generation,
    }) => {
      let table = render_listing(&templates, &list_invoices, query.clone()).await?;
      // Stored under the generation read above, so a mutation committed
      // while rendering orphans this render
      if let Err(e) = listing_cache
        .put(INVOICES_PATH, &variant, generation, &table)
        .await
      {
        tracing::warn!(request_id = ?req.request_id(), "Listing cache write failed: {}", e);
      }
      table
    }
    None => render_listing(&templates, &list_invoices, query.clone()).await?,
  };

  let mut context = tera::Context::new();
  context.insert("title", "Invoices");
  context.insert("user", &user);
  context.insert("query", query.query.trim());
  context.insert("listing_url", &req.uri().to_string());
  context.insert("table", &table);

  Ok(html(
    StatusCode::OK,
    templates.render("pages/invoices.html.tera", &context)?,
  ))
}

struct FormPage<'a> {
  user: &'a User,
  title: &'a str,
  action: String,
  submit_label: &'a str,
  form: &'a InvoiceForm,
  state: &'a ActionState,
}

async fn render_form_page(
  templates: &TemplateEngine,
  list_customers: &ListCustomersUseCase,
  page: FormPage<'_>,
) -> Result<String, ApiError> {
  // The form still shows its message when the customer list is unavailable
  let customers = list_customers.options().await.unwrap_or_else(|e| {
    tracing::error!("Failed to load customers for invoice form: {}", e);
    Vec::new()
  });
  let statuses: Vec<&str> = InvoiceStatus::ALL.iter().map(|s| s.as_str()).collect();

  let mut context = tera::Context::new();
  context.insert("title", page.title);
  context.insert("user", page.user);
  context.insert("action", &page.action);
  context.insert("submit_label", page.submit_label);
  context.insert("customers", &customers);
  context.insert("statuses", &statuses);
  context.insert("form", page.form);
  context.insert("state", page.state);

  Ok(templates.render("pages/invoice_form.html.tera", &context)?)
}

// GET /dashboard/invoices/create - Show invoice creation form
pub async fn invoice_create_page(
  req: HttpRequest,
  templates: web::Data<TemplateEngine>,
  list_customers: web::Data<Arc<ListCustomersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;

  let body = render_form_page(
    &templates,
    &list_customers,
    FormPage {
      user: &user,
      title: "Create Invoice",
      action: format!("{}/create", INVOICES_PATH),
      submit_label: "Create Invoice",
      form: &InvoiceForm::default(),
      state: &ActionState::default(),
    },
  )
  .await?;

  Ok(html(StatusCode::OK, body))
}

// POST /dashboard/invoices/create - Submit new invoice
pub async fn invoice_create_submit(
  req: HttpRequest,
  form: web::Form<InvoiceForm>,
  templates: web::Data<TemplateEngine>,
  create_invoice: web::Data<Arc<CreateInvoiceUseCase>>,
  list_customers: web::Data<Arc<ListCustomersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;
  let form = form.into_inner();

  match create_invoice.execute(form.clone()).await {
    Ok(outcome) => Ok(outcome_response(outcome)),
    Err(e) => {
      let state = ActionState::from_error(InvoiceAction::Create, &e);
      let body = render_form_page(
        &templates,
        &list_customers,
        FormPage {
          user: &user,
          title: "Create Invoice",
          action: format!("{}/create", INVOICES_PATH),
          submit_label: "Create Invoice",
          form: &form,
          state: &state,
        },
      )
      .await?;

      Ok(html(action_status(&e), body))
    }
  }
}

// GET /dashboard/invoices/{id}/edit - Show the pre-filled edit form
pub async fn invoice_edit_page(
  req: HttpRequest,
  path: web::Path<Uuid>,
  templates: web::Data<TemplateEngine>,
  get_invoice: web::Data<Arc<GetInvoiceUseCase>>,
  list_customers: web::Data<Arc<ListCustomersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;
  let invoice = get_invoice.execute(path.into_inner()).await?;

  let body = render_form_page(
    &templates,
    &list_customers,
    FormPage {
      user: &user,
      title: "Edit Invoice",
      action: format!("{}/{}/edit", INVOICES_PATH, invoice.id),
      submit_label: "Edit Invoice",
      form: &invoice.form,
      state: &ActionState::default(),
    },
  )
  .await?;

  Ok(html(StatusCode::OK, body))
}

// POST /dashboard/invoices/{id}/edit - Submit invoice changes
pub async fn invoice_edit_submit(
  req: HttpRequest,
  path: web::Path<Uuid>,
  form: web::Form<InvoiceForm>,
  templates: web::Data<TemplateEngine>,
  update_invoice: web::Data<Arc<UpdateInvoiceUseCase>>,
  list_customers: web::Data<Arc<ListCustomersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let user = get_user(&req)?;
  let invoice_id = path.into_inner();
  let form = form.into_inner();

  match update_invoice.execute(invoice_id, form.clone()).await {
    Ok(outcome) => Ok(outcome_response(outcome)),
    Err(e) => {
      let state = ActionState::from_error(InvoiceAction::Update, &e);
      let body = render_form_page(
        &templates,
        &list_customers,
        FormPage {
          user: &user,
          title: "Edit Invoice",
          action: format!("{}/{}/edit", INVOICES_PATH, invoice_id),
          submit_label: "Edit Invoice",
          form: &form,
          state: &state,
        },
      )
      .await?;

      Ok(html(action_status(&e), body))
    }
  }
}

// POST /dashboard/invoices/{id}/delete - Delete and report in the flash area
pub async fn invoice_delete(
  path: web::Path<Uuid>,
  templates: web::Data<TemplateEngine>,
  delete_invoice: web::Data<Arc<DeleteInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let (status, message, is_error) = match delete_invoice.execute(path.into_inner()).await {
    Ok(ActionOutcome::Message(message)) => (StatusCode::OK, message, false),
    Ok(outcome @ ActionOutcome::Redirect(_)) => return Ok(outcome_response(outcome)),
    Err(e) => {
      let state = ActionState::from_error(InvoiceAction::Delete, &e);
      (action_status(&e), state.message.unwrap_or_default(), true)
    }
  };

  let mut context = tera::Context::new();
  context.insert("message", &message);
  context.insert("is_error", &is_error);
  let body = templates.render("partials/flash.html.tera", &context)?;

  let mut response = HttpResponse::build(status);
  if !is_error {
    response.insert_header(("HX-Trigger", INVOICES_CHANGED_EVENT));
  }
  Ok(response.content_type("text/html").body(body))
}
