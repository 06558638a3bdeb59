//! Row types and the composed read views handlers serialize. Wire casing
//! follows the API's historical shape: camelCase keys except `unit_price`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub label: String,
    pub description: Option<String>,
    #[serde(rename = "unit_price")]
    pub unit_price: f64,
    pub cover: Option<String>,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: i32,
    pub url: String,
    pub product_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Variante {
    pub id: i32,
    #[serde(rename = "unit_price")]
    pub unit_price: f64,
    pub label: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub product_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full user row. Deliberately not serializable: the password hash must
/// never reach a response body. Serialize through [`UserView`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Password-free projection of a user.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub status: String,
    pub amount: f64,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i32,
    pub status: String,
    pub amount: f64,
    pub user_id: i32,
    pub order_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Composed read views

#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<Image>,
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variantes: Option<Vec<Variante>>,
}

/// A product as it appears inside an order, with the line quantity when
/// one was recorded.
#[derive(Debug, Serialize)]
pub struct OrderedProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub user: Option<UserView>,
    pub products: Vec<OrderedProduct>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub user: Option<UserView>,
    pub order: Option<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: 7,
            label: "Chair".to_string(),
            description: None,
            unit_price: 49.5,
            cover: None,
            category_id: 2,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn product_serializes_with_wire_casing() {
        let value = serde_json::to_value(sample_product()).unwrap();
        assert_eq!(value["categoryId"], 2);
        assert_eq!(value["unit_price"], 49.5);
        assert!(value.get("category_id").is_none());
    }

    #[test]
    fn detail_views_flatten_the_row() {
        let product = sample_product();
        let detail = ProductDetail {
            product: product.clone(),
            images: vec![],
            category: None,
            variantes: None,
        };
        let value = serde_json::to_value(detail).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["label"], "Chair");
        assert!(value["images"].as_array().unwrap().is_empty());
        // list views omit variantes entirely
        assert!(value.get("variantes").is_none());
    }

    #[test]
    fn user_view_has_no_password_field() {
        let now = Utc::now();
        let view = UserView::from(User {
            id: 1,
            email: "a@b.c".to_string(),
            password: "$2b$hash".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            phone: None,
            role: "USER".to_string(),
            created_at: now,
            updated_at: now,
        });
        let value = serde_json::to_value(view).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["firstName"], "Ada");
    }
}
