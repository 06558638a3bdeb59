use sqlx::PgPool;

use super::models::{User, UserView};

/// Fields for a new user row. The password is already hashed by the time
/// it reaches the store.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
}

/// List users with the password column excluded from the projection.
pub async fn list(pool: &PgPool) -> Result<Vec<UserView>, sqlx::Error> {
    sqlx::query_as::<_, UserView>(
        "SELECT id, email, first_name, last_name, phone, role, created_at, updated_at \
         FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, new_user: &NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password, first_name, last_name, phone, role) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&new_user.email)
    .bind(&new_user.password)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.phone)
    .bind(&new_user.role)
    .fetch_one(pool)
    .await
}
