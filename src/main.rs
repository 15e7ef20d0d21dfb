use actix_files as fs;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicedesk::{
  adapters::http::{
    LoginRateLimit, RequestIdMiddleware, SessionCookieSettings, TemplateEngine,
    WebRouteDependencies, configure_web_routes, health_check,
  },
  application::auth::{GetCurrentUserUseCase, LoginUserUseCase, LogoutUserUseCase},
  application::invoice::{
    CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, ListCustomersUseCase,
    ListInvoicesUseCase, UpdateInvoiceUseCase,
  },
  domain::auth::{AuthService, AuthServiceConfig, PasswordCredentialVerifier},
  domain::invoice::{
    InvoiceService, InvoiceServiceConfig, InvoiceServiceDependencies, ListingCache,
  },
  infrastructure::{
    cache::RedisListingCache,
    config::Config,
    persistence::postgres::{
      PostgresCustomerRepository, PostgresInvoiceRepository, PostgresSessionRepository,
      PostgresUserRepository,
    },
    security::Argon2PasswordHasher,
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoicedesk=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoicedesk");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .with_context(|| {
    format!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Could not connect to database")?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  tracing::info!("Connecting to Redis: {}", config.redis.url);

  let redis_client =
    redis::Client::open(config.redis.url.clone()).context("Invalid Redis URL")?;

  let redis_conn = tokio::time::timeout(
    Duration::from_secs(config.redis.connect_timeout_seconds),
    redis_client.get_connection_manager(),
  )
  .await
  .with_context(|| {
    format!(
      "Redis connection timed out after {} seconds. Is Redis running?",
      config.redis.connect_timeout_seconds
    )
  })?
  .with_context(|| format!("Could not connect to Redis at {}", config.redis.url))?;

  tracing::info!("Redis connection established");

  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let session_repo = Arc::new(PostgresSessionRepository::new(db_pool.clone()));
  let customer_repo = Arc::new(PostgresCustomerRepository::new(db_pool.clone()));
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));

  let listing_cache: Arc<dyn ListingCache> = Arc::new(RedisListingCache::new(
    redis_conn,
    config.cache.listing_ttl_seconds,
    Duration::from_millis(config.redis.op_timeout_ms),
  ));

  let password_hasher =
    Arc::new(Argon2PasswordHasher::new().context("Failed to create password hasher")?);
  let credential_verifier = Arc::new(PasswordCredentialVerifier::new(
    user_repo.clone(),
    password_hasher,
  ));

  let auth_service = Arc::new(AuthService::new(
    credential_verifier,
    user_repo,
    session_repo,
    AuthServiceConfig {
      session_ttl_seconds: i64::try_from(config.security.session_ttl_seconds)
        .context("security.session_ttl_seconds is too large")?,
    },
  ));

  let invoice_service = Arc::new(InvoiceService::new(
    InvoiceServiceDependencies {
      invoice_repo,
      customer_repo,
      listing_cache: listing_cache.clone(),
    },
    InvoiceServiceConfig {
      report_missing_on_update: config.invoices.report_missing_on_update,
      items_per_page: config.invoices.items_per_page,
    },
  ));

  let templates = TemplateEngine::new().context("Failed to load templates")?;

  let deps = WebRouteDependencies {
    templates,
    cookie_settings: SessionCookieSettings {
      secure: config.server.secure_cookies,
      max_age_seconds: i64::try_from(config.security.session_ttl_seconds)
        .context("security.session_ttl_seconds is too large")?,
    },
    login_rate_limit: LoginRateLimit {
      replenish_seconds: config.rate_limit.login_replenish_seconds,
      burst: config.rate_limit.login_burst,
    },
    listing_cache,
    login_use_case: Arc::new(LoginUserUseCase::new(auth_service.clone())),
    logout_use_case: Arc::new(LogoutUserUseCase::new(auth_service.clone())),
    get_user_use_case: Arc::new(GetCurrentUserUseCase::new(auth_service)),
    list_invoices_use_case: Arc::new(ListInvoicesUseCase::new(invoice_service.clone())),
    get_invoice_use_case: Arc::new(GetInvoiceUseCase::new(invoice_service.clone())),
    create_invoice_use_case: Arc::new(CreateInvoiceUseCase::new(invoice_service.clone())),
    update_invoice_use_case: Arc::new(UpdateInvoiceUseCase::new(invoice_service.clone())),
    delete_invoice_use_case: Arc::new(DeleteInvoiceUseCase::new(invoice_service.clone())),
    list_customers_use_case: Arc::new(ListCustomersUseCase::new(invoice_service)),
  };

  let bind_address = (config.server.host.clone(), config.server.port);
  tracing::info!(
    "Starting HTTP server on {}:{}",
    config.server.host,
    config.server.port
  );

  HttpServer::new(move || {
    let deps = deps.clone();
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .configure(|cfg| configure_web_routes(cfg, deps))
      .service(fs::Files::new("/static", "./static"))
      .route("/health", web::get().to(health_check))
  })
  .bind(bind_address)
  .with_context(|| {
    format!(
      "Failed to bind {}:{}",
      config.server.host, config.server.port
    )
  })?
  .run()
  .await
  .context("HTTP server failed")?;

  Ok(())
}
