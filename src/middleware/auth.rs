use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{self, Claims};
use crate::config;
use crate::error::ApiError;

/// Authenticated session context extracted from a verified JWT
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub user_id: i32,
    pub role: String,
}

impl From<Claims> for AuthSession {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.user_id, role: claims.role }
    }
}

/// Session gate: extractor that verifies the bearer JWT before the handler
/// body runs. Handlers that require a logged-in session take this as an
/// argument; a missing, expired or invalid token rejects with 401.
#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(ApiError::unauthorized)?;

        let secret = &config::config().security.jwt_secret;
        let claims = auth::verify_token(&token, secret).map_err(|e| match e {
            auth::TokenError::MissingSecret => {
                tracing::error!("session gate misconfigured: JWT secret is empty");
                ApiError::internal_server_error("Authentication is not configured")
            }
            other => ApiError::unauthorized(other.to_string()),
        })?;

        Ok(AuthSession::from(claims))
    }
}

/// Bearer gate: middleware comparing the presented token against the
/// configured shared secret. This is a static check, not per-user.
pub async fn bearer_guard(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let expected = &config::config().security.bearer_token;
    if expected.is_empty() {
        tracing::error!("bearer gate misconfigured: BEARER_TOKEN is empty");
        return Err(ApiError::internal_server_error("Authentication is not configured"));
    }
    if token != *expected {
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn rejects_missing_header() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let headers = headers_with_auth("Basic abc123");
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn rejects_empty_token() {
        let headers = headers_with_auth("Bearer ");
        assert!(extract_bearer_token(&headers).is_err());
    }
}
