use axum::extract::Path;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::models::OrderDetail;
use crate::store::orders::OrderLine;
use crate::store::{self, Store};
use crate::validation::schemas::{check_order_lines, OrderInput, OrderLineInput, OrderPatch};
use crate::validation::{parse_id, ValidatedJson};

/// GET /order - includes user and products
pub async fn list() -> ApiResult<Vec<OrderDetail>> {
    let pool = Store::pool()?;
    let orders = store::orders::list(pool).await?;
    Ok(ApiResponse::success(orders, "Orders retrieved successfully"))
}

/// POST /order - links the referenced products; a nonexistent user or
/// product id is rejected by the store.
pub async fn create(ValidatedJson(input): ValidatedJson<OrderInput>) -> ApiResult<OrderDetail> {
    check_order_lines(&input.products)?;
    let lines = to_lines(&input.products);

    let pool = Store::pool()?;
    let order =
        store::orders::create(pool, &input.status, input.amount, input.user_id, &lines).await?;
    Ok(ApiResponse::created(order, "Order created successfully"))
}

/// GET /order/:id
pub async fn get(Path(id): Path<String>) -> ApiResult<OrderDetail> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let order = store::orders::find_detail(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    Ok(ApiResponse::success(order, "Order retrieved successfully"))
}

/// PUT /order/:id - partial update; a provided `products` array replaces
/// the link set.
pub async fn update(
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<OrderPatch>,
) -> ApiResult<OrderDetail> {
    let id = parse_id(&id)?;
    let lines = match &patch.products {
        Some(products) => {
            check_order_lines(products)?;
            Some(to_lines(products))
        }
        None => None,
    };

    let pool = Store::pool()?;
    let order = store::orders::update(pool, id, &patch, lines.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    Ok(ApiResponse::success(order, "Order updated successfully"))
}

/// DELETE /order/:id - removes product links and invoices first
pub async fn delete(Path(id): Path<String>) -> ApiResult<Option<()>> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    if !store::orders::delete(pool, id).await? {
        return Err(ApiError::not_found("Order not found"));
    }
    Ok(ApiResponse::success(None, "Order deleted successfully"))
}

fn to_lines(products: &[OrderLineInput]) -> Vec<OrderLine> {
    products
        .iter()
        .map(|line| OrderLine { product_id: line.product_id(), quantity: line.quantity() })
        .collect()
}
