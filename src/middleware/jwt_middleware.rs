/// JWT Authentication Middleware
///
/// Guards protected routes: extracts the bearer token from the
/// Authorization header, validates it, and injects the claims into
/// request extensions for route handlers. On failure the pipeline is
/// short-circuited; downstream handlers never run.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::verify_access_token;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// JWT middleware for protecting routes
///
/// Must be applied to routes that require authentication.
pub struct JwtMiddleware {
    jwt_config: JwtSettings,
}

impl JwtMiddleware {
    /// Create new JWT middleware instance
    pub fn new(jwt_config: JwtSettings) -> Self {
        Self { jwt_config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            jwt_config: self.jwt_config.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    jwt_config: JwtSettings,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Extract the bearer token from the Authorization header
        let bearer_token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.to_string());

        match bearer_token {
            // No credential presented at all. This is the one failure the
            // gate reports distinctly, since it happens before any
            // cryptographic material is inspected.
            None => {
                tracing::warn!("Missing or non-bearer Authorization header");
                Box::pin(async move {
                    Err(AppError::Auth(AuthError::MissingCredential).into())
                })
            }
            Some(token) => match verify_access_token(&token, &self.jwt_config) {
                Ok(claims) => {
                    // Inject claims into request extensions
                    req.extensions_mut().insert(claims.clone());

                    tracing::debug!(
                        user_id = %claims.sub,
                        username = %claims.username,
                        "Access token validated"
                    );

                    let service = self.service.clone();
                    Box::pin(async move { service.call(req).await })
                }
                Err(e) => {
                    tracing::warn!("Access token validation failed: {}", e);
                    Box::pin(async move { Err(e.into()) })
                }
            },
        }
    }
}
