pub mod auth;
pub mod blob;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod store;
pub mod validation;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

/// Build the full router: one method table per resource path, a 404
/// fallback for unknown paths, and the CORS + trace layers around
/// everything. Preflight OPTIONS requests are answered by the CORS layer
/// before any route runs.
pub fn app() -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(category_routes())
        .merge(product_routes())
        .merge(variante_routes())
        .merge(order_routes())
        .merge(invoice_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .fallback(handlers::not_found)
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn category_routes() -> Router {
    use handlers::category;

    Router::new()
        .route(
            "/category",
            get(category::list)
                .post(category::create)
                .fallback(|| async { ApiError::method_not_allowed("GET, POST") }),
        )
        .route(
            "/category/:id",
            get(category::get)
                .put(category::update)
                .delete(category::delete)
                .fallback(|| async { ApiError::method_not_allowed("GET, PUT, DELETE") }),
        )
}

fn product_routes() -> Router {
    use handlers::product;

    Router::new()
        .route(
            "/product",
            get(product::list)
                .post(product::create)
                .fallback(|| async { ApiError::method_not_allowed("GET, POST") }),
        )
        .route(
            "/product/:id",
            get(product::get)
                .put(product::update)
                .delete(product::delete)
                .fallback(|| async { ApiError::method_not_allowed("GET, PUT, DELETE") }),
        )
}

fn variante_routes() -> Router {
    use handlers::variante;

    Router::new()
        .route(
            "/variante",
            get(variante::list)
                .post(variante::create)
                .fallback(|| async { ApiError::method_not_allowed("GET, POST") }),
        )
        .route(
            "/variante/:id",
            get(variante::get)
                .put(variante::update)
                .delete(variante::delete)
                .fallback(|| async { ApiError::method_not_allowed("GET, PUT, DELETE") }),
        )
}

fn order_routes() -> Router {
    use handlers::order;

    Router::new()
        .route(
            "/order",
            get(order::list)
                .post(order::create)
                .fallback(|| async { ApiError::method_not_allowed("GET, POST") }),
        )
        .route(
            "/order/:id",
            get(order::get)
                .put(order::update)
                .delete(order::delete)
                .fallback(|| async { ApiError::method_not_allowed("GET, PUT, DELETE") }),
        )
}

fn invoice_routes() -> Router {
    use handlers::invoice;

    // Collection PUT/DELETE are deliberately not routed.
    Router::new()
        .route(
            "/invoice",
            get(invoice::list)
                .post(invoice::create)
                .fallback(|| async { ApiError::method_not_allowed("GET, POST") }),
        )
        .route(
            "/invoice/:id",
            get(invoice::get)
                .put(invoice::update)
                .delete(invoice::delete)
                .fallback(|| async { ApiError::method_not_allowed("GET, PUT, DELETE") }),
        )
}

fn user_routes() -> Router {
    use handlers::{auth, users};

    Router::new()
        .route(
            "/users",
            get(users::list)
                .post(users::register)
                .fallback(|| async { ApiError::method_not_allowed("GET, POST") }),
        )
        .route(
            "/users/auth",
            post(auth::login).fallback(|| async { ApiError::method_not_allowed("POST") }),
        )
}

fn admin_routes() -> Router {
    use handlers::admin;

    Router::new()
        .route(
            "/admin/purge-orders",
            post(admin::purge_orders)
                .fallback(|| async { ApiError::method_not_allowed("POST") }),
        )
        .route_layer(axum::middleware::from_fn(middleware::bearer_guard))
}
