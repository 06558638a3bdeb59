use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::config;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::store::models::UserView;
use crate::store::{self, Store};
use crate::validation::schemas::AuthInput;
use crate::validation::ValidatedJson;

/// POST /users/auth - exchange credentials for a session token.
/// An unknown email is a 404; a wrong password is a 401.
pub async fn login(ValidatedJson(input): ValidatedJson<AuthInput>) -> ApiResult<Value> {
    let pool = Store::pool()?;
    let user = store::users::find_by_email(pool, &input.email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !auth::verify_password(&input.password, &user.password)? {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let claims = Claims::new(user.id, user.role.clone());
    let secret = &config::config().security.jwt_secret;
    let token = auth::generate_token(&claims, secret).map_err(|e| {
        tracing::error!("session token generation failed: {}", e);
        ApiError::internal_server_error("Could not establish a session")
    })?;

    Ok(ApiResponse::success(
        json!({ "token": token, "user": UserView::from(user) }),
        "Authentication successful",
    ))
}
