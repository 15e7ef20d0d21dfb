use actix_web::{
  Error, HttpMessage, HttpResponse, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header,
};
use futures_util::future::LocalBoxFuture;
use std::{future::ready, rc::Rc, sync::Arc};

use crate::adapters::http::errors::ApiError;
use crate::application::auth::GetCurrentUserUseCase;
use crate::domain::auth::errors::AuthError;

pub const SESSION_COOKIE: &str = "session_token";
pub const LOGIN_PATH: &str = "/login";

/// Guards dashboard routes with the `session_token` cookie.
///
/// A resolved user is inserted into request extensions. Missing, malformed,
/// unknown or expired sessions redirect to the login page; a failing user
/// or session store reaches the error boundary instead.
pub struct WebAuthMiddleware {
  get_current_user: Arc<GetCurrentUserUseCase>,
}

impl WebAuthMiddleware {
  pub fn new(get_current_user: Arc<GetCurrentUserUseCase>) -> Self {
    Self { get_current_user }
  }
}

impl<S, B> Transform<S, ServiceRequest> for WebAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type InitError = ();
  type Transform = WebAuthMiddlewareService<S>;
  type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(WebAuthMiddlewareService {
      service: Rc::new(service),
      get_current_user: self.get_current_user.clone(),
    }))
  }
}

pub struct WebAuthMiddlewareService<S> {
  service: Rc<S>,
  get_current_user: Arc<GetCurrentUserUseCase>,
}

fn redirect_to_login(req: ServiceRequest) -> ServiceResponse {
  req.into_response(
    HttpResponse::Found()
      .insert_header((header::LOCATION, LOGIN_PATH))
      .finish(),
  )
}

impl<S, B> Service<ServiceRequest> for WebAuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

    let get_current_user = self.get_current_user.clone();
    let service = Rc::clone(&self.service);

    Box::pin(async move {
      let Some(token) = token else {
        return Ok(redirect_to_login(req).map_into_right_body());
      };

      match get_current_user.execute(token).await {
        Ok(user) => {
          req.extensions_mut().insert(user);
          let res = service.call(req).await?;
          Ok(res.map_into_left_body())
        }
        Err(AuthError::InvalidSession) => {
          tracing::debug!(path = %req.path(), "No valid session, redirecting to login");
          Ok(redirect_to_login(req).map_into_right_body())
        }
        Err(e) => {
          let response = ApiError::from(e).error_response();
          Ok(req.into_response(response).map_into_right_body())
        }
      }
    })
  }
}
