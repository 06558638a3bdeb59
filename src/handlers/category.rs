use axum::extract::Path;

use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::models::{Category, CategoryDetail};
use crate::store::{self, Store};
use crate::validation::schemas::{CategoryInput, CategoryPatch};
use crate::validation::{parse_id, ValidatedJson};

/// GET /category
pub async fn list() -> ApiResult<Vec<Category>> {
    let pool = Store::pool()?;
    let categories = store::categories::list(pool).await?;
    Ok(ApiResponse::success(categories, "Categories retrieved successfully"))
}

/// POST /category
pub async fn create(ValidatedJson(input): ValidatedJson<CategoryInput>) -> ApiResult<Category> {
    let pool = Store::pool()?;
    let category = store::categories::create(pool, &input.label).await?;
    Ok(ApiResponse::created(category, "Category created successfully"))
}

/// GET /category/:id - includes the owned products
pub async fn get(Path(id): Path<String>) -> ApiResult<CategoryDetail> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let category = store::categories::find_with_products(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(ApiResponse::success(category, "Category retrieved successfully"))
}

/// PUT /category/:id - partial update
pub async fn update(
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<CategoryPatch>,
) -> ApiResult<Category> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let category = store::categories::update(pool, id, patch.label.as_deref())
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(ApiResponse::success(category, "Category updated successfully"))
}

/// DELETE /category/:id
pub async fn delete(Path(id): Path<String>) -> ApiResult<Option<()>> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    if !store::categories::delete(pool, id).await? {
        return Err(ApiError::not_found("Category not found"));
    }
    Ok(ApiResponse::success(None, "Category deleted successfully"))
}
