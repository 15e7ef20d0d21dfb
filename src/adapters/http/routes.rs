use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{guard, web};
use std::sync::Arc;

use crate::application::auth::{GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase};
use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, ListCustomersUseCase,
  ListInvoicesUseCase, UpdateInvoiceUseCase,
};
use crate::domain::invoice::ListingCache;

use super::handlers::web_auth::SessionCookieSettings;
use super::handlers::{customers_web, invoices_web, pages, web_auth};
use super::middleware::WebAuthMiddleware;
use super::templates::TemplateEngine;

/// Sign-in throttling, per client IP
#[derive(Debug, Clone, Copy)]
pub struct LoginRateLimit {
  /// Seconds needed to replenish one attempt
  pub replenish_seconds: u64,
  pub burst: u32,
}

/// Everything the web UI routes need, built once in `main`
#[derive(Clone)]
pub struct WebRouteDependencies {
  pub templates: TemplateEngine,
  pub cookie_settings: SessionCookieSettings,
  pub login_rate_limit: LoginRateLimit,
  pub listing_cache: Arc<dyn ListingCache>,
  pub login_use_case: Arc<LoginUserUseCase>,
  pub logout_use_case: Arc<LogoutUserUseCase>,
  pub get_user_use_case: Arc<GetCurrentUserUseCase>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
  pub get_invoice_use_case: Arc<GetInvoiceUseCase>,
  pub create_invoice_use_case: Arc<CreateInvoiceUseCase>,
  pub update_invoice_use_case: Arc<UpdateInvoiceUseCase>,
  pub delete_invoice_use_case: Arc<DeleteInvoiceUseCase>,
  pub list_customers_use_case: Arc<ListCustomersUseCase>,
}

/// Configure web UI routes
///
/// # Routes
///
/// - GET / - Redirect to the dashboard
/// - GET /login, POST /login - Sign-in form (POST is rate limited)
/// - POST /logout - End the session
/// - GET /dashboard - Redirect to the invoices listing
/// - GET /dashboard/invoices - Invoices listing (`?query=&page=`)
/// - GET|POST /dashboard/invoices/create - Create an invoice
/// - GET|POST /dashboard/invoices/{id}/edit - Edit an invoice
/// - POST /dashboard/invoices/{id}/delete - Delete an invoice
/// - GET /dashboard/customers - Customers listing (`?query=`)
pub fn configure_web_routes(cfg: &mut web::ServiceConfig, deps: WebRouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.templates.clone()))
    .app_data(web::Data::new(deps.cookie_settings));

  // Public routes (no authentication required)
  cfg
    .route("/", web::get().to(pages::home_redirect))
    .route("/login", web::get().to(pages::login_page))
    .service(
      web::resource("/logout")
        .app_data(web::Data::new(deps.logout_use_case))
        .route(web::post().to(web_auth::logout)),
    );

  let login_data = web::Data::new(deps.login_use_case);
  let limiter = GovernorConfigBuilder::default()
    .seconds_per_request(deps.login_rate_limit.replenish_seconds.max(1))
    .burst_size(deps.login_rate_limit.burst.max(1))
    .finish();

  match limiter {
    Some(limiter) => {
      cfg.service(
        web::resource("/login")
          .guard(guard::Post())
          .wrap(Governor::new(&limiter))
          .app_data(login_data)
          .route(web::post().to(web_auth::login_submit)),
      );
    }
    None => {
      tracing::warn!("Invalid login rate limit settings, sign-in is not throttled");
      cfg.service(
        web::resource("/login")
          .guard(guard::Post())
          .app_data(login_data)
          .route(web::post().to(web_auth::login_submit)),
      );
    }
  }

  // Protected routes (require authentication)
  cfg.service(
    web::scope("/dashboard")
      .wrap(WebAuthMiddleware::new(deps.get_user_use_case))
      .app_data(web::Data::new(deps.listing_cache))
      .app_data(web::Data::new(deps.list_invoices_use_case))
      .app_data(web::Data::new(deps.get_invoice_use_case))
      .app_data(web::Data::new(deps.create_invoice_use_case))
      .app_data(web::Data::new(deps.update_invoice_use_case))
      .app_data(web::Data::new(deps.delete_invoice_use_case))
      .app_data(web::Data::new(deps.list_customers_use_case))
      .route("", web::get().to(pages::dashboard_redirect))
      .route("/invoices", web::get().to(invoices_web::invoices_page))
      .route(
        "/invoices/create",
        web::get().to(invoices_web::invoice_create_page),
      )
      .route(
        "/invoices/create",
        web::post().to(invoices_web::invoice_create_submit),
      )
      .route(
        "/invoices/{id}/edit",
        web::get().to(invoices_web::invoice_edit_page),
      )
      .route(
        "/invoices/{id}/edit",
        web::post().to(invoices_web::invoice_edit_submit),
      )
      .route(
        "/invoices/{id}/delete",
        web::post().to(invoices_web::invoice_delete),
      )
      .route("/customers", web::get().to(customers_web::customers_page)),
  );
}
