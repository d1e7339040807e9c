use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only discussion entry on a request. Never updated; removed only
/// by the cascade when its parent request is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequestComment {
    pub id: Uuid,
    pub request_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
