use serde_json::{json, Value};

use crate::auth;
use crate::error::ApiError;
use crate::middleware::auth::AuthSession;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::models::UserView;
use crate::store::users::NewUser;
use crate::store::{self, Store};
use crate::validation::schemas::{ensure_role, RegisterInput};
use crate::validation::ValidatedJson;

/// GET /users - session required; passwords never leave the store.
pub async fn list(_session: AuthSession) -> ApiResult<Vec<UserView>> {
    let pool = Store::pool()?;
    let users = store::users::list(pool).await?;
    Ok(ApiResponse::success(users, "Users retrieved successfully"))
}

/// POST /users - register a new account
pub async fn register(ValidatedJson(input): ValidatedJson<RegisterInput>) -> ApiResult<Value> {
    ensure_role(&input.role)?;

    let pool = Store::pool()?;
    if store::users::find_by_email(pool, &input.email).await?.is_some() {
        return Err(ApiError::conflict("Email already in use"));
    }

    let hashed = auth::hash_password(&input.password)?;
    let user = store::users::create(
        pool,
        &NewUser {
            email: input.email,
            password: hashed,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            role: input.role,
        },
    )
    .await?;

    Ok(ApiResponse::created(json!({ "userId": user.id }), "User registered successfully"))
}
