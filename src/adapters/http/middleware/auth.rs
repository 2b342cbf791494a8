use actix_web::{
  Error, HttpMessage, HttpResponse,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::adapters::http::dtos::ErrorResponse;
use crate::domain::auth::{AuthService, Session};

const SESSION_COOKIE: &str = "session";

/// Session gate for the invoice API.
///
/// Accepts the token from an `Authorization: Bearer` header or the `session`
/// cookie, validates it against stored sessions and attaches the [`Session`]
/// to request extensions. Requests without a valid session get a 401 in the
/// standard error envelope.
pub struct SessionAuthMiddleware {
  auth_service: Arc<AuthService>,
}

impl SessionAuthMiddleware {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = SessionAuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(SessionAuthMiddlewareService {
      service: Rc::new(service),
      auth_service: self.auth_service.clone(),
    }))
  }
}

pub struct SessionAuthMiddlewareService<S> {
  service: Rc<S>,
  auth_service: Arc<AuthService>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddlewareService<S>
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
    let service = Rc::clone(&self.service);
    let auth_service = self.auth_service.clone();

    Box::pin(async move {
      let token = match extract_session_token(&req) {
        Some(token) => token,
        None => return Ok(unauthorized(req)),
      };

      let session = match auth_service.validate(&token).await {
        Ok(session) => session,
        Err(_) => return Ok(unauthorized(req)),
      };

      req.extensions_mut().insert::<Session>(session);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

fn extract_session_token(req: &ServiceRequest) -> Option<String> {
  let bearer = req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.to_string());

  bearer.or_else(|| req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()))
}

fn unauthorized<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
  let (request, _) = req.into_parts();
  let response = HttpResponse::Unauthorized()
    .json(ErrorResponse {
      success: false,
      message: "Authentication required. Please log in.".to_string(),
      status_code: 401,
    })
    .map_into_right_body();
  ServiceResponse::new(request, response)
}
