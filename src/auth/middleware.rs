//! Bearer-token authentication middleware.
//!
//! Wraps the protected route scopes. On every request it verifies the JWT
//! signature, confirms the token has not been revoked (its row still exists
//! in the `tokens` table), loads the owning user, and inserts an
//! [`AuthSession`](crate::auth::extractors::AuthSession) into the request
//! extensions for handlers to extract. Any failure short-circuits with a 404
//! `{"error": "Please authenticate."}` response, so an unauthenticated caller
//! cannot tell a protected resource apart from a missing one.

use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::extractors::AuthSession;
use crate::auth::token::verify_token;
use crate::error::AppError;
use crate::repo;

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc because the session lookup is async and the future must own a handle
    // to the inner service.
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned)
                .ok_or(AppError::Unauthenticated)?;

            let claims = verify_token(&token)?;

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Database pool not configured".into()))?;

            // The token must still be in the user's session list; a logged-out
            // token fails here even though its signature is valid.
            let user = repo::users::find_by_session(&pool, claims.sub, &token)
                .await?
                .ok_or(AppError::Unauthenticated)?;

            req.extensions_mut().insert(AuthSession { user, token });

            service.call(req).await
        })
    }
}
