use serde_json::{json, Value};

use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::{self, Store};

/// POST /admin/purge-orders - clear all order data, dependents first:
/// product links, then invoices, then orders. Guarded by the bearer gate.
pub async fn purge_orders() -> ApiResult<Value> {
    let pool = Store::pool()?;
    let (links, invoices, orders) = store::orders::purge_all(pool).await?;

    tracing::info!(links, invoices, orders, "purged order tables");

    Ok(ApiResponse::success(
        json!({ "orderProducts": links, "invoices": invoices, "orders": orders }),
        "Order data cleared successfully",
    ))
}
