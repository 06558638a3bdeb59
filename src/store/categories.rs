use sqlx::PgPool;

use super::models::{Category, CategoryDetail, Product};

pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn create(pool: &PgPool, label: &str) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>("INSERT INTO categories (label) VALUES ($1) RETURNING *")
        .bind(label)
        .fetch_one(pool)
        .await
}

/// Fetch one category with its owned products.
pub async fn find_with_products(
    pool: &PgPool,
    id: i32,
) -> Result<Option<CategoryDetail>, sqlx::Error> {
    let Some(category) = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let products =
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE category_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(pool)
            .await?;

    Ok(Some(CategoryDetail { category, products }))
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    label: Option<&str>,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "UPDATE categories SET label = COALESCE($2, label), updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(label)
    .fetch_optional(pool)
    .await
}

/// Returns false when no row matched. Products still referencing the
/// category make the store reject the delete.
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
