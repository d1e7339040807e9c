//! Comment store. Visibility mirrors the parent request; insertion runs as
//! INSERT ... SELECT against the parent-visibility predicate so the policy
//! check and the write are one atomic statement.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::RequestComment;
use crate::policy::{parent_visible_sql, rule, Action, Table};

const COMMENT_COLUMNS: &str = "id, request_id, user_id, user_name, comment, created_at";

/// List a request's comments, oldest first, scoped to parent visibility.
pub async fn list(
    pool: &PgPool,
    caller_id: Uuid,
    request_id: Uuid,
) -> Result<Vec<RequestComment>, DatabaseError> {
    let scope = rule(Table::Comments, Action::Select).sql("$1");
    let sql = format!(
        "SELECT {} FROM request_comments WHERE request_id = $2 AND {} ORDER BY created_at ASC",
        COMMENT_COLUMNS, scope
    );

    Ok(sqlx::query_as::<_, RequestComment>(&sql)
        .bind(caller_id)
        .bind(request_id)
        .fetch_all(pool)
        .await?)
}

/// Append a comment as the caller. The author columns are bound from the
/// authenticated identity; the parent-visibility predicate decides inside
/// the statement whether the row is written at all. `None` means the policy
/// rejected it (or the parent does not exist).
pub async fn insert(
    pool: &PgPool,
    caller_id: Uuid,
    caller_name: &str,
    request_id: Uuid,
    comment: &str,
) -> Result<Option<RequestComment>, DatabaseError> {
    let visible = parent_visible_sql("$3", "$2");
    let sql = format!(
        "INSERT INTO request_comments (id, request_id, user_id, user_name, comment) \
         SELECT $1, $2, $3, $4, $5 WHERE {} \
         RETURNING {}",
        visible, COMMENT_COLUMNS
    );

    Ok(sqlx::query_as::<_, RequestComment>(&sql)
        .bind(Uuid::new_v4())
        .bind(request_id)
        .bind(caller_id)
        .bind(caller_name)
        .bind(comment)
        .fetch_optional(pool)
        .await?)
}
