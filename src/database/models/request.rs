use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked request as stored. category/priority/status hold the canonical
/// string forms of the enums in `crate::types`; the classifier writes them
/// at creation and handlers triage them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Request {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub submitter_id: Uuid,
    pub submitter_name: String,
    pub assigned_unit: String,
    pub assigned_handler: Option<String>,
    pub ai_response: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
}
