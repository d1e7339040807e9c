// handlers/public/auth.rs - token acquisition endpoints
//
// The identity provider proper is external; these endpoints stand in for
// its token exchange. register establishes an identity's submitter role
// row (the only self-registration path the policy allows), login mints a
// token for an existing identity and reports its effective role.

use std::collections::HashMap;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::roles;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::types::Role;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    /// identity id from the external provider; generated when absent
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub user_id: Uuid,
    pub name: String,
}

/// POST /auth/register - establish an identity and its submitter role row
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
    let name = require_name(&body.name)?;
    let user_id = body.user_id.unwrap_or_else(Uuid::new_v4);

    roles::grant_self(&state.pool, user_id, Role::Submitter)
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => ApiError::conflict("identity is already registered"),
            other => ApiError::from(other),
        })?;

    let token = generate_jwt(&Claims::new(user_id, name.to_string()))?;
    tracing::info!(%user_id, "registered new submitter");

    Ok(ApiResponse::created(json!({
        "token": token,
        "user": { "id": user_id, "name": name, "role": Role::Submitter },
        "expires_in": expires_in_secs(),
    })))
}

/// POST /auth/login - mint a token for an existing identity
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let name = require_name(&body.name)?;

    // view routing fail-opens to submitter when no role row exists
    let role = roles::effective_role(&state.pool, body.user_id).await?;
    let token = generate_jwt(&Claims::new(body.user_id, name.to_string()))?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": { "id": body.user_id, "name": name, "role": role },
        "expires_in": expires_in_secs(),
    })))
}

fn require_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut field_errors = HashMap::new();
        field_errors.insert("name".to_string(), "This field is required".to_string());
        return Err(ApiError::validation_error("Missing required fields", Some(field_errors)));
    }
    Ok(trimmed)
}

fn expires_in_secs() -> u64 {
    config::config().security.jwt_expiry_hours * 3600
}
