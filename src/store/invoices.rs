use std::collections::HashMap;

use sqlx::PgPool;

use super::models::{Invoice, InvoiceDetail, Order};
use super::orders::users_by_id;
use crate::validation::schemas::{InvoiceInput, InvoicePatch};

pub async fn list(pool: &PgPool) -> Result<Vec<InvoiceDetail>, sqlx::Error> {
    let invoices = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices ORDER BY id")
        .fetch_all(pool)
        .await?;
    if invoices.is_empty() {
        return Ok(Vec::new());
    }

    let user_ids: Vec<i32> = invoices.iter().map(|i| i.user_id).collect();
    let users = users_by_id(pool, &user_ids).await?;

    let order_ids: Vec<i32> = invoices.iter().map(|i| i.order_id).collect();
    let orders: HashMap<i32, Order> =
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ANY($1)")
            .bind(&order_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

    Ok(invoices
        .into_iter()
        .map(|invoice| InvoiceDetail {
            user: users.get(&invoice.user_id).cloned(),
            order: orders.get(&invoice.order_id).cloned(),
            invoice,
        })
        .collect())
}

pub async fn find_detail(pool: &PgPool, id: i32) -> Result<Option<InvoiceDetail>, sqlx::Error> {
    let Some(invoice) = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    with_relations(pool, invoice).await.map(Some)
}

pub async fn create(pool: &PgPool, input: &InvoiceInput) -> Result<InvoiceDetail, sqlx::Error> {
    let invoice = sqlx::query_as::<_, Invoice>(
        "INSERT INTO invoices (status, amount, user_id, order_id) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&input.status)
    .bind(input.amount)
    .bind(input.user_id)
    .bind(input.order_id)
    .fetch_one(pool)
    .await?;

    with_relations(pool, invoice).await
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    patch: &InvoicePatch,
) -> Result<Option<InvoiceDetail>, sqlx::Error> {
    let Some(invoice) = sqlx::query_as::<_, Invoice>(
        "UPDATE invoices SET \
            status = COALESCE($2, status), \
            amount = COALESCE($3, amount), \
            user_id = COALESCE($4, user_id), \
            order_id = COALESCE($5, order_id), \
            updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&patch.status)
    .bind(patch.amount)
    .bind(patch.user_id)
    .bind(patch.order_id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    with_relations(pool, invoice).await.map(Some)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn with_relations(pool: &PgPool, invoice: Invoice) -> Result<InvoiceDetail, sqlx::Error> {
    let users = users_by_id(pool, &[invoice.user_id]).await?;
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(invoice.order_id)
        .fetch_optional(pool)
        .await?;

    Ok(InvoiceDetail { user: users.get(&invoice.user_id).cloned(), order, invoice })
}
