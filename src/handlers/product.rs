use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::Path;
use futures::future::try_join_all;

use crate::blob::BlobStore;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::models::ProductDetail;
use crate::store::{self, Store};
use crate::validation::multipart::{read_product_form, ProductForm, UploadedFile};
use crate::validation::parse_id;
use crate::validation::schemas::{ProductInput, ProductPatch};

/// GET /product - list with images and category included
pub async fn list() -> ApiResult<Vec<ProductDetail>> {
    let pool = Store::pool()?;
    let products = store::products::list(pool).await?;
    Ok(ApiResponse::success(products, "Products retrieved successfully"))
}

/// POST /product - multipart form with `images` (0..n) and optional `cover`
pub async fn create(
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ProductDetail> {
    let form = accept_form(multipart).await?;
    let input = ProductInput::from_form(&form.fields)?;

    let pool = Store::pool()?;
    let (cover_url, image_urls) = upload_files(&form).await?;

    let product =
        store::products::create(pool, &input, cover_url.as_deref(), &image_urls).await?;
    Ok(ApiResponse::created(product, "Product created successfully"))
}

/// GET /product/:id - includes images, category and variantes
pub async fn get(Path(id): Path<String>) -> ApiResult<ProductDetail> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let product = store::products::find_detail(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(ApiResponse::success(product, "Product retrieved successfully"))
}

/// PUT /product/:id - partial scalar update; the image set is replaced
/// with exactly the files uploaded in this request.
pub async fn update(
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ProductDetail> {
    let id = parse_id(&id)?;
    let form = accept_form(multipart).await?;
    let patch = ProductPatch::from_form(&form.fields)?;

    let pool = Store::pool()?;
    let (cover_url, image_urls) = upload_files(&form).await?;

    let product = store::products::update(pool, id, &patch, cover_url.as_deref(), &image_urls)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(ApiResponse::success(product, "Product updated successfully"))
}

/// DELETE /product/:id - dereference stored images first, then remove the
/// product and its child rows.
pub async fn delete(Path(id): Path<String>) -> ApiResult<Option<()>> {
    let id = parse_id(&id)?;
    let pool = Store::pool()?;
    let product = store::products::find_detail(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    // The blob store keeps the objects; losing track of them is accepted.
    for image in &product.images {
        tracing::warn!(url = %image.url, product_id = id, "orphaning stored image of deleted product");
    }

    store::products::delete(pool, id).await?;
    Ok(ApiResponse::success(None, "Product deleted successfully"))
}

async fn accept_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ProductForm, ApiError> {
    let multipart = multipart
        .map_err(|e| ApiError::bad_request(format!("Expected multipart form data: {}", e.body_text())))?;
    read_product_form(multipart).await
}

/// Store the cover, then dispatch all image uploads concurrently and wait
/// for the full set. One failed upload fails the request; blobs that made
/// it are not retracted.
async fn upload_files(form: &ProductForm) -> Result<(Option<String>, Vec<String>), ApiError> {
    let blob = match has_files(form) {
        true => BlobStore::client()?,
        false => return Ok((None, Vec::new())),
    };

    let cover_url = match &form.cover {
        Some(file) => Some(put_file(blob, file).await?),
        None => None,
    };

    let image_urls = try_join_all(form.images.iter().map(|file| put_file(blob, file))).await?;
    Ok((cover_url, image_urls))
}

async fn put_file(blob: &BlobStore, file: &UploadedFile) -> Result<String, ApiError> {
    Ok(blob.put(&file.filename, file.bytes.clone()).await?)
}

fn has_files(form: &ProductForm) -> bool {
    form.cover.is_some() || !form.images.is_empty()
}
