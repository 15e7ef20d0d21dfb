pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;

// Re-export commonly used types
pub use dtos::{ActionState, ErrorResponse, ListingQuery, LoginForm};
pub use errors::{ApiError, AuthErrorKind};
pub use handlers::pages::health_check;
pub use handlers::web_auth::SessionCookieSettings;
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware, WebAuthMiddleware};
pub use routes::{LoginRateLimit, WebRouteDependencies, configure_web_routes};
pub use templates::TemplateEngine;
