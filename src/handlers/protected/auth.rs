// handlers/protected/auth.rs - session introspection and role self-service

use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::database::manager::DatabaseError;
use crate::database::roles;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};
use crate::types::Role;
use crate::AppState;

/// GET /api/auth/whoami - caller identity and effective role
pub async fn whoami(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let role = roles::effective_role(&state.pool, caller.id).await?;

    Ok(ApiResponse::success(json!({
        "id": caller.id,
        "name": caller.name,
        "role": role,
    })))
}

/// GET /api/auth/roles - the caller's own role rows
pub async fn roles_get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = roles::list_own(&state.pool, caller.id).await?;
    Ok(ApiResponse::success(rows))
}

#[derive(Debug, Deserialize)]
pub struct GrantBody {
    pub role: Role,
}

/// POST /api/auth/roles - self-service role grant. The policy permits
/// inserting rows only for one's own identity; the store binds the caller
/// id, so no other identity can be named here.
pub async fn roles_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<GrantBody>,
) -> Result<impl IntoResponse, ApiError> {
    let row = roles::grant_self(&state.pool, caller.id, body.role)
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            other => ApiError::from(other),
        })?;

    tracing::info!(user_id = %caller.id, role = %body.role, "role granted");
    Ok(ApiResponse::created(row))
}
