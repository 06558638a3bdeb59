use std::collections::HashMap;

use sqlx::PgPool;

use super::models::{Category, Image, Product, ProductDetail, Variante};
use crate::validation::schemas::{ProductInput, ProductPatch};

/// List all products with their images and category.
pub async fn list(pool: &PgPool) -> Result<Vec<ProductDetail>, sqlx::Error> {
    let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY id")
        .fetch_all(pool)
        .await?;
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    let mut images_by_product: HashMap<i32, Vec<Image>> = HashMap::new();
    for image in
        sqlx::query_as::<_, Image>("SELECT * FROM images WHERE product_id = ANY($1) ORDER BY id")
            .bind(&ids)
            .fetch_all(pool)
            .await?
    {
        images_by_product.entry(image.product_id).or_default().push(image);
    }

    let category_ids: Vec<i32> = products.iter().map(|p| p.category_id).collect();
    let categories: HashMap<i32, Category> =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ANY($1)")
            .bind(&category_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

    Ok(products
        .into_iter()
        .map(|product| ProductDetail {
            images: images_by_product.remove(&product.id).unwrap_or_default(),
            category: categories.get(&product.category_id).cloned(),
            variantes: None,
            product,
        })
        .collect())
}

/// Fetch one product with images, category and variantes.
pub async fn find_detail(pool: &PgPool, id: i32) -> Result<Option<ProductDetail>, sqlx::Error> {
    let Some(product) = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let images = images_of(pool, id).await?;
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(product.category_id)
        .fetch_optional(pool)
        .await?;
    let variantes =
        sqlx::query_as::<_, Variante>("SELECT * FROM variantes WHERE product_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await?;

    Ok(Some(ProductDetail { product, images, category, variantes: Some(variantes) }))
}

/// Insert the product row, then its image child rows from the uploaded
/// URLs. The two writes are separate statements.
pub async fn create(
    pool: &PgPool,
    input: &ProductInput,
    cover_url: Option<&str>,
    image_urls: &[String],
) -> Result<ProductDetail, sqlx::Error> {
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (label, description, unit_price, category_id, cover) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(&input.label)
    .bind(&input.description)
    .bind(input.unit_price)
    .bind(input.category_id)
    .bind(cover_url)
    .fetch_one(pool)
    .await?;

    insert_images(pool, product.id, image_urls).await?;

    let images = images_of(pool, product.id).await?;
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(product.category_id)
        .fetch_optional(pool)
        .await?;

    Ok(ProductDetail { product, images, category, variantes: None })
}

/// Apply the provided scalar fields, then replace the entire image set
/// with the uploaded URLs (delete-all then recreate, never a merge).
pub async fn update(
    pool: &PgPool,
    id: i32,
    patch: &ProductPatch,
    cover_url: Option<&str>,
    image_urls: &[String],
) -> Result<Option<ProductDetail>, sqlx::Error> {
    let Some(product) = sqlx::query_as::<_, Product>(
        "UPDATE products SET \
            label = COALESCE($2, label), \
            description = COALESCE($3, description), \
            unit_price = COALESCE($4, unit_price), \
            category_id = COALESCE($5, category_id), \
            cover = COALESCE($6, cover), \
            updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&patch.label)
    .bind(&patch.description)
    .bind(patch.unit_price)
    .bind(patch.category_id)
    .bind(cover_url)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM images WHERE product_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    insert_images(pool, id, image_urls).await?;

    let images = images_of(pool, id).await?;
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(product.category_id)
        .fetch_optional(pool)
        .await?;

    Ok(Some(ProductDetail { product, images, category, variantes: None }))
}

/// Remove child rows, then the product. Separate statements; the caller
/// has already dealt with the stored blobs.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM images WHERE product_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM variantes WHERE product_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

async fn insert_images(pool: &PgPool, product_id: i32, urls: &[String]) -> Result<(), sqlx::Error> {
    if urls.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO images (url, product_id) \
         SELECT t.url, $2 FROM unnest($1::text[]) AS t(url)",
    )
    .bind(urls)
    .bind(product_id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn images_of(pool: &PgPool, product_id: i32) -> Result<Vec<Image>, sqlx::Error> {
    sqlx::query_as::<_, Image>("SELECT * FROM images WHERE product_id = $1 ORDER BY id")
        .bind(product_id)
        .fetch_all(pool)
        .await
}
