use std::collections::HashMap;

use sqlx::{FromRow, PgPool};

use super::models::{Order, OrderDetail, OrderedProduct, Product, UserView};
use crate::validation::schemas::OrderPatch;

/// One product reference inside an order, with its optional quantity.
#[derive(Debug, Clone, Copy)]
pub struct OrderLine {
    pub product_id: i32,
    pub quantity: Option<i32>,
}

#[derive(Debug, FromRow)]
struct OrderLineRow {
    order_id: i32,
    quantity: Option<i32>,
    #[sqlx(flatten)]
    product: Product,
}

pub async fn list(pool: &PgPool) -> Result<Vec<OrderDetail>, sqlx::Error> {
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY id")
        .fetch_all(pool)
        .await?;
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let mut lines = lines_of(pool, &ids).await?;

    let user_ids: Vec<i32> = orders.iter().map(|o| o.user_id).collect();
    let users = users_by_id(pool, &user_ids).await?;

    Ok(orders
        .into_iter()
        .map(|order| OrderDetail {
            user: users.get(&order.user_id).cloned(),
            products: lines.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect())
}

pub async fn find_detail(pool: &PgPool, id: i32) -> Result<Option<OrderDetail>, sqlx::Error> {
    let Some(order) = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let mut lines = lines_of(pool, &[id]).await?;
    let users = users_by_id(pool, &[order.user_id]).await?;

    Ok(Some(OrderDetail {
        user: users.get(&order.user_id).cloned(),
        products: lines.remove(&id).unwrap_or_default(),
        order,
    }))
}

/// Insert the order row, then its product links. A link referencing a
/// nonexistent product or an order referencing a nonexistent user is
/// rejected by the store's referential-integrity checks.
pub async fn create(
    pool: &PgPool,
    status: &str,
    amount: f64,
    user_id: i32,
    lines: &[OrderLine],
) -> Result<OrderDetail, sqlx::Error> {
    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (status, amount, user_id) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(status)
    .bind(amount)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    insert_lines(pool, order.id, lines).await?;

    find_detail(pool, order.id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Partial scalar update; when `lines` is provided the product link set is
/// replaced wholesale.
pub async fn update(
    pool: &PgPool,
    id: i32,
    patch: &OrderPatch,
    lines: Option<&[OrderLine]>,
) -> Result<Option<OrderDetail>, sqlx::Error> {
    let updated = sqlx::query_as::<_, Order>(
        "UPDATE orders SET \
            status = COALESCE($2, status), \
            amount = COALESCE($3, amount), \
            user_id = COALESCE($4, user_id), \
            updated_at = now() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&patch.status)
    .bind(patch.amount)
    .bind(patch.user_id)
    .fetch_optional(pool)
    .await?;

    if updated.is_none() {
        return Ok(None);
    }

    if let Some(lines) = lines {
        sqlx::query("DELETE FROM order_products WHERE order_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        insert_lines(pool, id, lines).await?;
    }

    find_detail(pool, id).await
}

/// Dependents first: product links, then invoices, then the order itself.
/// Three separate statements.
pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM order_products WHERE order_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    sqlx::query("DELETE FROM invoices WHERE order_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Clear all order data, dependents first. Returns the number of deleted
/// product links, invoices and orders.
pub async fn purge_all(pool: &PgPool) -> Result<(u64, u64, u64), sqlx::Error> {
    let links = sqlx::query("DELETE FROM order_products").execute(pool).await?.rows_affected();
    let invoices = sqlx::query("DELETE FROM invoices").execute(pool).await?.rows_affected();
    let orders = sqlx::query("DELETE FROM orders").execute(pool).await?.rows_affected();
    Ok((links, invoices, orders))
}

async fn insert_lines(pool: &PgPool, order_id: i32, lines: &[OrderLine]) -> Result<(), sqlx::Error> {
    if lines.is_empty() {
        return Ok(());
    }

    let product_ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
    let quantities: Vec<Option<i32>> = lines.iter().map(|l| l.quantity).collect();

    sqlx::query(
        "INSERT INTO order_products (order_id, product_id, quantity) \
         SELECT $1, t.product_id, t.quantity \
         FROM unnest($2::int4[], $3::int4[]) AS t(product_id, quantity)",
    )
    .bind(order_id)
    .bind(&product_ids)
    .bind(&quantities)
    .execute(pool)
    .await?;
    Ok(())
}

async fn lines_of(
    pool: &PgPool,
    order_ids: &[i32],
) -> Result<HashMap<i32, Vec<OrderedProduct>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, OrderLineRow>(
        "SELECT op.order_id, op.quantity, p.* \
         FROM order_products op \
         JOIN products p ON p.id = op.product_id \
         WHERE op.order_id = ANY($1) \
         ORDER BY op.id",
    )
    .bind(order_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i32, Vec<OrderedProduct>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.order_id)
            .or_default()
            .push(OrderedProduct { product: row.product, quantity: row.quantity });
    }
    Ok(grouped)
}

pub(super) async fn users_by_id(
    pool: &PgPool,
    user_ids: &[i32],
) -> Result<HashMap<i32, UserView>, sqlx::Error> {
    let users = sqlx::query_as::<_, UserView>(
        "SELECT id, email, first_name, last_name, phone, role, created_at, updated_at \
         FROM users WHERE id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}
