// handlers/protected/requests.rs - request CRUD
//
// Creation runs the classifier with caller overrides; everything after
// creation is policy-scoped CRUD against the store. Mutations publish a
// change event so subscribed clients refetch.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::{response::IntoResponse, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::classifier;
use crate::database::requests as request_store;
use crate::database::requests::{NewRequest, RequestPatch};
use crate::error::ApiError;
use crate::feed::{ChangeOp, FeedTable};
use crate::filter::RequestFilter;
use crate::middleware::{ApiResponse, AuthUser};
use crate::types::{Category, Priority, Status};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub category: Option<Category>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

/// GET /api/requests - policy-scoped listing, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = RequestFilter {
        q: query.q.filter(|q| !q.trim().is_empty()),
        category: query.category,
        status: query.status,
        priority: query.priority,
    };

    let rows = request_store::list(&state.pool, caller.id, &filter).await?;
    Ok(ApiResponse::success(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// manual override; wins over the classifier when present
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub deadline: Option<DateTime<Utc>>,
}

/// POST /api/requests - create a request as the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
    let title = body.title.trim();
    if title.is_empty() {
        let mut field_errors = HashMap::new();
        field_errors.insert("title".to_string(), "This field is required".to_string());
        return Err(ApiError::validation_error("Missing required fields", Some(field_errors)));
    }

    let classification =
        classifier::classify_with_overrides(title, &body.description, body.category, body.priority);

    let row = request_store::insert(
        &state.pool,
        caller.id,
        &caller.name,
        NewRequest {
            title: title.to_string(),
            description: body.description,
            classification,
            deadline: body.deadline,
        },
    )
    .await?;

    tracing::info!(request_id = %row.id, category = %row.category, priority = %row.priority, "request created");
    state.feed.publish(FeedTable::Requests, ChangeOp::Insert);

    Ok(ApiResponse::created(row))
}

/// GET /api/requests/:id - fetch one visible request
pub async fn fetch(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    match request_store::fetch(&state.pool, caller.id, id).await? {
        Some(row) => Ok(ApiResponse::success(row)),
        None => Err(ApiError::not_found("request not found")),
    }
}

#[derive(Debug, Deserialize)]
pub struct PatchBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub assigned_unit: Option<String>,
    pub assigned_handler: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// PATCH /api/requests/:id - handler triage. A denied caller gets the same
/// answer as a missing row.
pub async fn patch(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<PatchBody>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = RequestPatch {
        title: body.title,
        description: body.description,
        category: body.category,
        priority: body.priority,
        status: body.status,
        assigned_unit: body.assigned_unit,
        assigned_handler: body.assigned_handler,
        deadline: body.deadline,
    };

    if patch.is_empty() {
        return Err(ApiError::bad_request("no fields to update"));
    }

    match request_store::update(&state.pool, caller.id, id, &patch).await? {
        Some(row) => {
            state.feed.publish(FeedTable::Requests, ChangeOp::Update);
            Ok(ApiResponse::success(row))
        }
        None => Err(ApiError::not_found("request not found")),
    }
}

/// DELETE /api/requests/:id - handler only; comments cascade
pub async fn remove(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if request_store::delete(&state.pool, caller.id, id).await? {
        tracing::info!(request_id = %id, "request deleted");
        state.feed.publish(FeedTable::Requests, ChangeOp::Delete);
        Ok(ApiResponse::<()>::no_content())
    } else {
        Err(ApiError::not_found("request not found"))
    }
}
