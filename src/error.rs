// HTTP API Error Types
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Map of field name to the list of validation messages for that field.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation { message: String, errors: FieldErrors },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed (carries the Allow header value)
    MethodNotAllowed { allowed: &'static str },

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::MethodNotAllowed { .. } => "Method not allowed",
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to the uniform error envelope body
    pub fn to_json(&self) -> Value {
        let errors = match self {
            ApiError::Validation { errors, .. } => json!(errors),
            _ => Value::Null,
        };

        json!({
            "success": false,
            "message": self.message(),
            "errors": errors,
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        ApiError::Validation { message: message.into(), errors }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// `allowed` is rendered verbatim into the `Allow` response header,
    /// e.g. `"GET, PUT, DELETE"`.
    pub fn method_not_allowed(allowed: &'static str) -> Self {
        ApiError::MethodNotAllowed { allowed }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert infrastructure error types to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // unique_violation
                Some("23505") => ApiError::conflict("A record with this value already exists"),
                // foreign_key_violation
                Some("23503") => {
                    ApiError::conflict("Operation refers to a record that does not exist")
                }
                _ => {
                    tracing::error!("database error: {}", db.message());
                    ApiError::internal_server_error("Database error occurred")
                }
            },
            _ => {
                // Log the real error but return a generic message
                tracing::error!("database error: {}", err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::ConfigMissing(name) => {
                tracing::error!("store configuration missing: {}", name);
                ApiError::internal_server_error("Store is not configured")
            }
            crate::store::StoreError::Sqlx(e) => e.into(),
            crate::store::StoreError::Migrate(e) => {
                tracing::error!("migration error: {}", e);
                ApiError::internal_server_error("Store is being updated, please try again later")
            }
        }
    }
}

impl From<crate::blob::BlobError> for ApiError {
    fn from(err: crate::blob::BlobError) -> Self {
        tracing::error!("blob store error: {}", err);
        ApiError::internal_server_error("File upload failed")
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("password hashing error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = self.to_json();
        let mut response = (status, Json(body)).into_response();

        if let ApiError::MethodNotAllowed { allowed } = self {
            if let Ok(value) = HeaderValue::from_str(allowed) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::method_not_allowed("GET, POST").status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal_server_error("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_envelope_shape() {
        let body = ApiError::not_found("Category not found").to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Category not found");
        assert!(body["errors"].is_null());
    }

    #[test]
    fn validation_envelope_carries_field_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("label".to_string(), vec!["Category label is required".to_string()]);
        let body = ApiError::validation("Invalid input", errors).to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"]["label"][0], "Category label is required");
    }

    #[test]
    fn method_not_allowed_sets_allow_header() {
        let response = ApiError::method_not_allowed("GET, PUT, DELETE").into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, PUT, DELETE");
    }
}
