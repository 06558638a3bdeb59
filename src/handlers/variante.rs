use axum::extract::Path;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::models::Variante;
use crate::store::{self, Store};
use crate::validation::schemas::{VarianteInput, VariantePatch};
use crate::validation::{parse_id, ValidatedJson};

/// GET /variante
pub async fn list() -> ApiResult<Vec<Variante>> {
    let pool = Store::pool()?;
    let variantes = store::variantes::list(pool).await?;
    Ok(ApiResponse::success(variantes, "Variantes retrieved successfully"))
}

/// POST /variante
pub async fn create(ValidatedJson(input): ValidatedJson<VarianteInput>) -> ApiResult<Variante> {
    let pool = Store::pool()?;
    let variante = store::variantes::create(pool, &input).await?;
    Ok(ApiResponse::created(variante, "Variante created successfully"))
}

/// GET /variante/:id
pub async fn get(Path(id): Path<String>) -> ApiResult<Variante> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let variante = store::variantes::find(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Variante not found"))?;
    Ok(ApiResponse::success(variante, "Variante retrieved successfully"))
}

/// PUT /variante/:id - partial update
pub async fn update(
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<VariantePatch>,
) -> ApiResult<Variante> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let variante = store::variantes::update(pool, id, &patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Variante not found"))?;
    Ok(ApiResponse::success(variante, "Variante updated successfully"))
}

/// DELETE /variante/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<Option<()>> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    if !store::variantes::delete(pool, id).await? {
        return Err(ApiError::not_found("Variante not found"));
    }
    Ok(ApiResponse::success(None, "Variante deleted successfully"))
}
