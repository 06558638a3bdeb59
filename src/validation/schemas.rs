//! Input schemas for every resource, mirroring the constraints the API
//! advertises: length bounds on labels, non-negative amounts and prices,
//! positive integer references, enum membership for roles.

use std::collections::HashMap;

use serde::Deserialize;
use validator::Validate;

use crate::error::{ApiError, FieldErrors};
use crate::validation::field_errors;

pub const ROLES: &[&str] = &["ADMIN", "USER"];

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100, message = "Category label must be between 1 and 100 characters"))]
    pub label: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 100, message = "Category label must be between 1 and 100 characters"))]
    pub label: Option<String>,
}

/// Full product field set, built from coerced multipart form fields.
#[derive(Debug, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 100, message = "Product label must be between 1 and 100 characters"))]
    pub label: String,
    #[validate(length(max = 1000, message = "Description must be 1000 characters or less"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "categoryId must be a positive integer"))]
    pub category_id: i32,
    #[validate(range(min = 0.0, message = "unit_price must be a positive number"))]
    pub unit_price: f64,
}

impl ProductInput {
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, ApiError> {
        let mut errors = FieldErrors::new();

        let category_id = match fields.get("categoryId") {
            Some(raw) => coerce_int(raw, "categoryId", &mut errors),
            None => {
                push_error(&mut errors, "categoryId", "categoryId is required");
                0
            }
        };
        let unit_price = match fields.get("unit_price") {
            Some(raw) => coerce_number(raw, "unit_price", &mut errors),
            None => 0.0,
        };

        if !errors.is_empty() {
            return Err(ApiError::validation("Invalid input", errors));
        }

        let input = Self {
            label: fields.get("label").cloned().unwrap_or_default(),
            description: fields.get("description").cloned().filter(|s| !s.is_empty()),
            category_id,
            unit_price,
        };
        input
            .validate()
            .map_err(|e| ApiError::validation("Invalid input", field_errors(e)))?;
        Ok(input)
    }
}

/// Partial product update: only the provided form fields are applied.
#[derive(Debug, Default, Validate)]
pub struct ProductPatch {
    #[validate(length(min = 1, max = 100, message = "Product label must be between 1 and 100 characters"))]
    pub label: Option<String>,
    #[validate(length(max = 1000, message = "Description must be 1000 characters or less"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "categoryId must be a positive integer"))]
    pub category_id: Option<i32>,
    #[validate(range(min = 0.0, message = "unit_price must be a positive number"))]
    pub unit_price: Option<f64>,
}

impl ProductPatch {
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, ApiError> {
        let mut errors = FieldErrors::new();

        let category_id = fields
            .get("categoryId")
            .map(|raw| coerce_int(raw, "categoryId", &mut errors));
        let unit_price = fields
            .get("unit_price")
            .map(|raw| coerce_number(raw, "unit_price", &mut errors));

        if !errors.is_empty() {
            return Err(ApiError::validation("Invalid input", errors));
        }

        let patch = Self {
            label: fields.get("label").cloned(),
            description: fields.get("description").cloned(),
            category_id,
            unit_price,
        };
        patch
            .validate()
            .map_err(|e| ApiError::validation("Invalid input", field_errors(e)))?;
        Ok(patch)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct VarianteInput {
    #[validate(range(min = 0.0, message = "unit_price must be a positive number"))]
    pub unit_price: f64,
    #[validate(length(min = 1, max = 100, message = "Label must be between 1 and 100 characters"))]
    pub label: Option<String>,
    #[validate(length(max = 100, message = "Reference must be 100 characters or less"))]
    pub reference: Option<String>,
    #[validate(length(max = 1000, message = "Description must be 1000 characters or less"))]
    pub description: Option<String>,
    #[serde(rename = "productId")]
    #[validate(range(min = 1, message = "productId must be a positive integer"))]
    pub product_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VariantePatch {
    #[validate(range(min = 0.0, message = "unit_price must be a positive number"))]
    pub unit_price: Option<f64>,
    #[validate(length(min = 1, max = 100, message = "Label must be between 1 and 100 characters"))]
    pub label: Option<String>,
    #[validate(length(max = 100, message = "Reference must be 100 characters or less"))]
    pub reference: Option<String>,
    #[validate(length(max = 1000, message = "Description must be 1000 characters or less"))]
    pub description: Option<String>,
    #[serde(rename = "productId")]
    #[validate(range(min = 1, message = "productId must be a positive integer"))]
    pub product_id: Option<i32>,
}

/// An order line referencing a product: either a bare product id or an
/// object carrying an explicit quantity. Both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OrderLineInput {
    Id(i32),
    Line {
        #[serde(rename = "productId")]
        product_id: i32,
        quantity: Option<i32>,
    },
}

impl OrderLineInput {
    pub fn product_id(&self) -> i32 {
        match self {
            OrderLineInput::Id(id) => *id,
            OrderLineInput::Line { product_id, .. } => *product_id,
        }
    }

    pub fn quantity(&self) -> Option<i32> {
        match self {
            OrderLineInput::Id(_) => None,
            OrderLineInput::Line { quantity, .. } => *quantity,
        }
    }
}

/// Bounds checks for order lines. Runs after deserialization since the
/// untagged enum carries the constraints itself.
pub fn check_order_lines(lines: &[OrderLineInput]) -> Result<(), ApiError> {
    let mut messages = Vec::new();
    for line in lines {
        if line.product_id() < 1 {
            messages.push("Product ID must be a positive integer".to_string());
        }
        if matches!(line.quantity(), Some(q) if q < 1) {
            messages.push("Quantity must be a positive integer".to_string());
        }
    }

    if messages.is_empty() {
        return Ok(());
    }
    let mut errors = FieldErrors::new();
    messages.dedup();
    errors.insert("products".to_string(), messages);
    Err(ApiError::validation("Invalid input", errors))
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderInput {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[validate(range(min = 0.0, message = "Amount must be a positive number"))]
    pub amount: f64,
    #[serde(rename = "userId")]
    #[validate(range(min = 1, message = "User ID must be a positive integer"))]
    pub user_id: i32,
    pub products: Vec<OrderLineInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderPatch {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: Option<String>,
    #[validate(range(min = 0.0, message = "Amount must be a positive number"))]
    pub amount: Option<f64>,
    #[serde(rename = "userId")]
    #[validate(range(min = 1, message = "User ID must be a positive integer"))]
    pub user_id: Option<i32>,
    pub products: Option<Vec<OrderLineInput>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InvoiceInput {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[validate(range(min = 0.0, message = "Amount must be a positive number"))]
    pub amount: f64,
    #[serde(rename = "userId")]
    #[validate(range(min = 1, message = "User ID must be a positive integer"))]
    pub user_id: i32,
    #[serde(rename = "orderId")]
    #[validate(range(min = 1, message = "Order ID must be a positive integer"))]
    pub order_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InvoicePatch {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: Option<String>,
    #[validate(range(min = 0.0, message = "Amount must be a positive number"))]
    pub amount: Option<f64>,
    #[serde(rename = "userId")]
    #[validate(range(min = 1, message = "User ID must be a positive integer"))]
    pub user_id: Option<i32>,
    #[serde(rename = "orderId")]
    #[validate(range(min = 1, message = "Order ID must be a positive integer"))]
    pub order_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Role membership check; kept separate from the derive so the error
/// lands in the same field map as the other constraints.
pub fn ensure_role(role: &str) -> Result<(), ApiError> {
    if ROLES.contains(&role) {
        return Ok(());
    }
    let mut errors = FieldErrors::new();
    errors.insert("role".to_string(), vec!["Role must be one of ADMIN, USER".to_string()]);
    Err(ApiError::validation("Invalid input", errors))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AuthInput {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn coerce_int(raw: &str, field: &str, errors: &mut FieldErrors) -> i32 {
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            push_error(errors, field, &format!("{} must be an integer", field));
            0
        }
    }
}

fn coerce_number(raw: &str, field: &str, errors: &mut FieldErrors) -> f64 {
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            push_error(errors, field, &format!("{} must be a number", field));
            0.0
        }
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors.entry(field.to_string()).or_default().push(message.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_category_label_names_the_field() {
        let input = CategoryInput { label: String::new() };
        let err = input.validate().unwrap_err();
        assert!(field_errors(err).contains_key("label"));
    }

    #[test]
    fn product_form_coerces_numeric_strings() {
        let fields = form(&[("label", "Chair"), ("categoryId", "3"), ("unit_price", "19.90")]);
        let input = ProductInput::from_form(&fields).unwrap();
        assert_eq!(input.category_id, 3);
        assert_eq!(input.unit_price, 19.90);
    }

    #[test]
    fn product_form_reports_coercion_failure_as_field_error() {
        let fields = form(&[("label", "Chair"), ("categoryId", "three")]);
        let err = ProductInput::from_form(&fields).unwrap_err();
        match err {
            ApiError::Validation { errors, .. } => {
                assert_eq!(errors["categoryId"], vec!["categoryId must be an integer".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn product_form_requires_category() {
        let fields = form(&[("label", "Chair")]);
        let err = ProductInput::from_form(&fields).unwrap_err();
        match err {
            ApiError::Validation { errors, .. } => assert!(errors.contains_key("categoryId")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn product_patch_accepts_subsets() {
        let patch = ProductPatch::from_form(&form(&[("unit_price", "5")])).unwrap();
        assert_eq!(patch.unit_price, Some(5.0));
        assert!(patch.label.is_none());
        assert!(patch.category_id.is_none());
    }

    #[test]
    fn order_lines_accept_both_shapes() {
        let lines: Vec<OrderLineInput> =
            serde_json::from_str(r#"[4, {"productId": 9, "quantity": 2}]"#).unwrap();
        assert_eq!(lines[0].product_id(), 4);
        assert_eq!(lines[0].quantity(), None);
        assert_eq!(lines[1].product_id(), 9);
        assert_eq!(lines[1].quantity(), Some(2));
        assert!(check_order_lines(&lines).is_ok());
    }

    #[test]
    fn order_lines_reject_non_positive_ids() {
        let lines: Vec<OrderLineInput> = serde_json::from_str("[0]").unwrap();
        assert!(check_order_lines(&lines).is_err());
    }

    #[test]
    fn role_membership() {
        assert!(ensure_role("ADMIN").is_ok());
        assert!(ensure_role("USER").is_ok());
        assert!(ensure_role("ROOT").is_err());
    }
}
