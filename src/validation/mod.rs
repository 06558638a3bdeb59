use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, FieldErrors};

pub mod multipart;
pub mod schemas;

/// JSON body extractor that runs schema validation before the handler sees
/// the value. Produces the structured field-error envelope on failure.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e.body_text())))?;

        value
            .validate()
            .map_err(|e| ApiError::validation("Invalid input", field_errors(e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten `validator` output into a field -> messages map.
pub fn field_errors(errors: ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, list)| {
            let messages = list
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Coerce a path segment into a numeric id. Coercion failures are client
/// errors, not faults.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse().map_err(|_| ApiError::bad_request("Invalid ID format"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, serde::Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    #[test]
    fn collects_field_errors() {
        let probe = Probe { name: String::new() };
        let errors = field_errors(probe.validate().unwrap_err());
        assert_eq!(errors["name"], vec!["name is required".to_string()]);
    }

    #[test]
    fn parses_valid_id() {
        assert_eq!(parse_id("17").unwrap(), 17);
    }

    #[test]
    fn rejects_non_numeric_id() {
        let err = parse_id("seventeen").unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
