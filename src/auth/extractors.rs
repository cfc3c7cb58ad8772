use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The authenticated session attached to the request by `AuthMiddleware`:
/// the resolved user together with the exact token the request carried.
///
/// Keeping the token around lets `POST /users/logout` revoke precisely the
/// current session and no other.
///
/// If no session is found in the extensions (the middleware did not run or
/// rejected the request), this extractor fails with the same 404 the
/// middleware would have produced.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl FromRequest for AuthSession {
    type Error = ActixError; // AppError is converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthSession>().cloned() {
            Some(session) => ready(Ok(session)),
            None => ready(Err(AppError::Unauthenticated.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use uuid::Uuid;

    fn fixture_session() -> AuthSession {
        AuthSession {
            user: User {
                id: Uuid::new_v4(),
                name: "Andrew".to_string(),
                email: "andrew@example.com".to_string(),
                password: "$2b$12$hash".to_string(),
                age: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            token: "some.jwt.token".to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_auth_session_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        let session = fixture_session();
        let expected_id = session.user.id;
        req.extensions_mut().insert(session);

        let mut payload = Payload::None;
        let extracted = AuthSession::from_request(&req, &mut payload).await;
        assert!(extracted.is_ok());

        let extracted = extracted.unwrap();
        assert_eq!(extracted.user.id, expected_id);
        assert_eq!(extracted.token, "some.jwt.token");
    }

    #[actix_rt::test]
    async fn test_auth_session_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();
        // No session inserted into extensions

        let mut payload = Payload::None;
        let result = AuthSession::from_request(&req, &mut payload).await;
        assert!(result.is_err());

        let err = result.unwrap_err();
        let response = err.error_response();
        // Unauthenticated access is masked as 404
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
