//! Request store. Every statement embeds the policy predicate for its
//! operation, so authorization is decided by the database in the same
//! round-trip as the query. Callers cannot distinguish a vanished row
//! from a denied one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::classifier::Classification;
use crate::database::manager::DatabaseError;
use crate::database::models::Request;
use crate::filter::RequestFilter;
use crate::policy::{rule, Action, Predicate, Table};
use crate::types::{Category, Priority, Status};

const REQUEST_COLUMNS: &str = "id, title, description, category, priority, status, submitter_id, \
     submitter_name, assigned_unit, assigned_handler, ai_response, created_at, updated_at, \
     resolved_at, deadline";

/// Payload for creating a request. Classification has already been applied
/// (including caller overrides) by the time this reaches the store.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub classification: Classification,
    pub deadline: Option<DateTime<Utc>>,
}

/// Triage fields a handler may change. `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub assigned_unit: Option<String>,
    pub assigned_handler: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

impl RequestPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.assigned_unit.is_none()
            && self.assigned_handler.is_none()
            && self.deadline.is_none()
    }
}

enum Bind {
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Insert a new request owned by the caller. The insert policy
/// (submitter_id == uid) is satisfied by construction: the submitter
/// columns are bound from the authenticated identity, never the payload.
pub async fn insert(
    pool: &PgPool,
    caller_id: Uuid,
    caller_name: &str,
    new: NewRequest,
) -> Result<Request, DatabaseError> {
    let sql = format!(
        "INSERT INTO requests (id, title, description, category, priority, status, submitter_id, \
         submitter_name, assigned_unit, ai_response, deadline) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING {}",
        REQUEST_COLUMNS
    );

    let request = sqlx::query_as::<_, Request>(&sql)
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.classification.category.as_str())
        .bind(new.classification.priority.as_str())
        .bind(Status::Received.as_str())
        .bind(caller_id)
        .bind(caller_name)
        .bind(new.classification.assigned_unit)
        .bind(&new.classification.generated_response)
        .bind(new.deadline)
        .fetch_one(pool)
        .await?;

    Ok(request)
}

/// List requests visible to the caller, newest first.
pub async fn list(
    pool: &PgPool,
    caller_id: Uuid,
    filter: &RequestFilter,
) -> Result<Vec<Request>, DatabaseError> {
    let scope = rule(Table::Requests, Action::Select).sql("$1");
    let (filter_sql, binds) = filter.where_sql(2);
    let sql = format!(
        "SELECT {} FROM requests WHERE {}{} ORDER BY created_at DESC",
        REQUEST_COLUMNS, scope, filter_sql
    );

    let mut query = sqlx::query_as::<_, Request>(&sql).bind(caller_id);
    for bind in binds {
        query = query.bind(bind);
    }

    Ok(query.fetch_all(pool).await?)
}

/// Fetch one request by id, policy-scoped. `None` covers both a missing row
/// and a row the caller may not see.
pub async fn fetch(
    pool: &PgPool,
    caller_id: Uuid,
    id: Uuid,
) -> Result<Option<Request>, DatabaseError> {
    let scope = rule(Table::Requests, Action::Select).sql("$1");
    let sql = format!(
        "SELECT {} FROM requests WHERE id = $2 AND {}",
        REQUEST_COLUMNS, scope
    );

    Ok(sqlx::query_as::<_, Request>(&sql)
        .bind(caller_id)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Apply a triage patch. Guarded by the update policy in the WHERE clause;
/// stamps updated_at on every hit and maintains the resolved_at invariant
/// whenever status changes. Returns `None` when the row is missing or the
/// caller is not a handler.
pub async fn update(
    pool: &PgPool,
    caller_id: Uuid,
    id: Uuid,
    patch: &RequestPatch,
) -> Result<Option<Request>, DatabaseError> {
    let (sql, binds) = build_update_sql(patch);

    let mut query = sqlx::query_as::<_, Request>(&sql).bind(id).bind(caller_id);
    for bind in binds {
        query = match bind {
            Bind::Text(s) => query.bind(s),
            Bind::Timestamp(t) => query.bind(t),
        };
    }

    Ok(query.fetch_optional(pool).await?)
}

/// Delete a request (handler only); comments go with it via the cascade.
/// Returns whether a row was actually removed.
pub async fn delete(pool: &PgPool, caller_id: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
    let guard = Predicate::Handler.sql("$2");
    let sql = format!("DELETE FROM requests WHERE id = $1 AND {}", guard);

    let result = sqlx::query(&sql).bind(id).bind(caller_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Build the dynamic UPDATE statement for a patch. $1 is the row id, $2 the
/// caller id; value binds start at $3. When status is present, resolved_at
/// is derived in the same statement: stamped on a transition into Resolved
/// (preserving an earlier stamp), cleared on a transition away.
fn build_update_sql(patch: &RequestPatch) -> (String, Vec<Bind>) {
    let mut sets = vec!["updated_at = now()".to_string()];
    let mut binds: Vec<Bind> = Vec::new();
    let mut n = 3;

    if let Some(title) = &patch.title {
        sets.push(format!("title = ${}", n));
        binds.push(Bind::Text(title.clone()));
        n += 1;
    }
    if let Some(description) = &patch.description {
        sets.push(format!("description = ${}", n));
        binds.push(Bind::Text(description.clone()));
        n += 1;
    }
    if let Some(category) = patch.category {
        sets.push(format!("category = ${}", n));
        binds.push(Bind::Text(category.as_str().to_string()));
        n += 1;
    }
    if let Some(priority) = patch.priority {
        sets.push(format!("priority = ${}", n));
        binds.push(Bind::Text(priority.as_str().to_string()));
        n += 1;
    }
    if let Some(status) = patch.status {
        sets.push(format!("status = ${}", n));
        sets.push(format!(
            "resolved_at = CASE WHEN ${} = 'Resolved' THEN COALESCE(resolved_at, now()) ELSE NULL END",
            n
        ));
        binds.push(Bind::Text(status.as_str().to_string()));
        n += 1;
    }
    if let Some(assigned_unit) = &patch.assigned_unit {
        sets.push(format!("assigned_unit = ${}", n));
        binds.push(Bind::Text(assigned_unit.clone()));
        n += 1;
    }
    if let Some(assigned_handler) = &patch.assigned_handler {
        sets.push(format!("assigned_handler = ${}", n));
        binds.push(Bind::Text(assigned_handler.clone()));
        n += 1;
    }
    if let Some(deadline) = patch.deadline {
        sets.push(format!("deadline = ${}", n));
        binds.push(Bind::Timestamp(deadline));
    }

    let guard = rule(Table::Requests, Action::Update).sql("$2");
    let sql = format!(
        "UPDATE requests SET {} WHERE id = $1 AND {} RETURNING {}",
        sets.join(", "),
        guard,
        REQUEST_COLUMNS
    );

    (sql, binds)
}
