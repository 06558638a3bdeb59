use sqlx::PgPool;

use super::models::Variante;
use crate::validation::schemas::{VarianteInput, VariantePatch};

pub async fn list(pool: &PgPool) -> Result<Vec<Variante>, sqlx::Error> {
    sqlx::query_as::<_, Variante>("SELECT * FROM variantes ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &PgPool, id: i32) -> Result<Option<Variante>, sqlx::Error> {
    sqlx::query_as::<_, Variante>("SELECT * FROM variantes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, input: &VarianteInput) -> Result<Variante, sqlx::Error> {
    sqlx::query_as::<_, Variante>(
        "INSERT INTO variantes (unit_price, label, reference, description, product_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(input.unit_price)
    .bind(&input.label)
    .bind(&input.reference)
    .bind(&input.description)
    .bind(input.product_id)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    patch: &VariantePatch,
) -> Result<Option<Variante>, sqlx::Error> {
    sqlx::query_as::<_, Variante>(
        "UPDATE variantes SET \
            unit_price = COALESCE($2, unit_price), \
            label = COALESCE($3, label), \
            reference = COALESCE($4, reference), \
            description = COALESCE($5, description), \
            product_id = COALESCE($6, product_id), \
            updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(patch.unit_price)
    .bind(&patch.label)
    .bind(&patch.reference)
    .bind(&patch.description)
    .bind(patch.product_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM variantes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
