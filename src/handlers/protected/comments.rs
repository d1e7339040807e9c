// handlers/protected/comments.rs - request discussion threads

use axum::extract::{Path, State};
use axum::{response::IntoResponse, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::{comments as comment_store, requests as request_store};
use crate::error::ApiError;
use crate::feed::{ChangeOp, FeedTable};
use crate::middleware::{ApiResponse, AuthUser};
use crate::AppState;

/// GET /api/requests/:id/comments - visible iff the parent is visible
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // comment visibility mirrors request visibility; an invisible parent
    // answers the same as a missing one
    if request_store::fetch(&state.pool, caller.id, request_id).await?.is_none() {
        return Err(ApiError::not_found("request not found"));
    }

    let rows = comment_store::list(&state.pool, caller.id, request_id).await?;
    Ok(ApiResponse::success(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub comment: String,
}

/// POST /api/requests/:id/comments - append a comment as the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
    let text = body.comment.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("comment must not be empty"));
    }

    match comment_store::insert(&state.pool, caller.id, &caller.name, request_id, text).await? {
        Some(row) => {
            state.feed.publish(FeedTable::Comments, ChangeOp::Insert);
            Ok(ApiResponse::created(row))
        }
        // the policy refused inside the statement: parent missing, or
        // neither owned by the caller nor handler-visible
        None => Err(ApiError::forbidden("not permitted to comment on this request")),
    }
}
