use axum::extract::Path;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::models::InvoiceDetail;
use crate::store::{self, Store};
use crate::validation::schemas::{InvoiceInput, InvoicePatch};
use crate::validation::{parse_id, ValidatedJson};

/// GET /invoice - includes user and order
pub async fn list() -> ApiResult<Vec<InvoiceDetail>> {
    let pool = Store::pool()?;
    let invoices = store::invoices::list(pool).await?;
    Ok(ApiResponse::success(invoices, "Invoices retrieved successfully"))
}

/// POST /invoice
pub async fn create(ValidatedJson(input): ValidatedJson<InvoiceInput>) -> ApiResult<InvoiceDetail> {
    let pool = Store::pool()?;
    let invoice = store::invoices::create(pool, &input).await?;
    Ok(ApiResponse::created(invoice, "Invoice created successfully"))
}

/// GET /invoice/:id
pub async fn get(Path(id): Path<String>) -> ApiResult<InvoiceDetail> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let invoice = store::invoices::find_detail(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice not found"))?;
    Ok(ApiResponse::success(invoice, "Invoice retrieved successfully"))
}

/// PUT /invoice/:id - partial update
pub async fn update(
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<InvoicePatch>,
) -> ApiResult<InvoiceDetail> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let invoice = store::invoices::update(pool, id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice not found"))?;
    Ok(ApiResponse::success(invoice, "Invoice updated successfully"))
}

/// DELETE /invoice/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<Option<()>> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    if !store::invoices::delete(pool, id).await? {
        return Err(ApiError::not_found("Invoice not found"));
    }
    Ok(ApiResponse::success(None, "Invoice deleted successfully"))
}
