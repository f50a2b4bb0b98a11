//! Authentication extractor.
//!
//! Protected routes accept either credential style:
//! - `Authorization: Bearer <jwt>` as issued by `POST /api/users/login`
//! - `Authorization: Basic base64(email:password)`, checked against the stored hash

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use base64::{Engine, engine::general_purpose::STANDARD};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use blog_core::DomainError;
use blog_core::ports::{AuthError, TokenClaims};

use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::HashingError(_) | AuthError::Internal(_) => {
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use blog_shared::ErrorResponse;

        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::InvalidCredentials => ErrorResponse::unauthorized()
                .with_detail("Invalid email or password."),
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Provide a Bearer token or Basic credentials in the Authorization header."),
            AuthError::HashingError(msg) => {
                tracing::error!("Password hash check failed: {}", msg);
                ErrorResponse::internal_error()
            }
            AuthError::Internal(msg) => {
                tracing::error!("Credential lookup failed: {}", msg);
                ErrorResponse::internal_error()
            }
        };

        let mut response = actix_web::HttpResponse::build(self.status_code());
        if self.status_code() == actix_web::http::StatusCode::UNAUTHORIZED {
            response.insert_header((header::WWW_AUTHENTICATE, "Bearer, Basic realm=\"blog\""));
        }
        response.json(error)
    }
}

/// Credentials as presented in the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum Credentials {
    Bearer(String),
    Basic { email: String, password: String },
}

impl Credentials {
    fn parse(header_value: &str) -> Result<Self, AuthError> {
        if let Some(token) = header_value.strip_prefix("Bearer ") {
            return Ok(Credentials::Bearer(token.trim().to_string()));
        }

        if let Some(encoded) = header_value.strip_prefix("Basic ") {
            let decoded = STANDARD
                .decode(encoded.trim())
                .map_err(|_| AuthError::InvalidToken("Malformed Basic credentials".to_string()))?;
            let decoded = String::from_utf8(decoded)
                .map_err(|_| AuthError::InvalidToken("Malformed Basic credentials".to_string()))?;
            let (email, password) = decoded
                .split_once(':')
                .ok_or_else(|| AuthError::InvalidToken("Malformed Basic credentials".to_string()))?;

            return Ok(Credentials::Basic {
                email: email.to_string(),
                password: password.to_string(),
            });
        }

        Err(AuthError::InvalidToken(
            "Expected Bearer or Basic credentials".to_string(),
        ))
    }

    fn from_request(req: &HttpRequest) -> Result<Self, AuthError> {
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingAuth)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

        Self::parse(auth_str)
    }
}

/// Only a rejected password is the client's fault; anything else went wrong on our side.
fn basic_auth_failure(err: DomainError) -> AuthError {
    match err {
        DomainError::Unauthorized => AuthError::InvalidCredentials,
        other => AuthError::Internal(other.to_string()),
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let credentials = Credentials::from_request(req);

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AuthenticationError(AuthError::InvalidToken(
                    "Server configuration error".to_string(),
                )));
            };

            match credentials.map_err(AuthenticationError)? {
                Credentials::Bearer(token) => state
                    .tokens
                    .validate_token(&token)
                    .map(Identity::from)
                    .map_err(AuthenticationError),
                Credentials::Basic { email, password } => state
                    .users
                    .authenticate(&email, &password)
                    .await
                    .map(|user| Identity { user_id: user.id })
                    .map_err(|err| AuthenticationError(basic_auth_failure(err))),
            }
        })
    }
}
