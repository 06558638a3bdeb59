pub mod admin;
pub mod auth;
pub mod category;
pub mod invoice;
pub mod order;
pub mod product;
pub mod users;
pub mod variante;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;

use crate::error::ApiError;
use crate::store::Store;

/// GET / - service descriptor
pub async fn root() -> Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "message": "Catalog API",
        "data": {
            "name": "Catalog API",
            "version": version,
            "endpoints": {
                "category": "/category, /category/{id}",
                "product": "/product, /product/{id} (multipart with images)",
                "variante": "/variante, /variante/{id}",
                "order": "/order, /order/{id}",
                "invoice": "/invoice, /invoice/{id}",
                "users": "/users (GET requires a session), /users/auth",
                "admin": "/admin/purge-orders (bearer token required)",
                "health": "/health",
            }
        }
    }))
}

/// GET /health - store connectivity probe
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match Store::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "ok",
                "data": { "status": "ok", "database": "ok", "timestamp": now }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "message": "database unavailable",
                "errors": e.to_string(),
            })),
        ),
    }
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
