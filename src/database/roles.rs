//! Role store. Inserts are self-service only (the caller id is bound as
//! user_id), selects are scoped to the caller's own rows, and there is no
//! update or delete function at all: the policy table has no grant path for
//! those operations and this module mirrors that exactly.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::UserRole;
use crate::policy::{rule, Action, Table};
use crate::types::Role;

const ROLE_COLUMNS: &str = "id, user_id, role, created_at";

/// Grant the caller a role. Duplicate grants surface as a conflict.
pub async fn grant_self(
    pool: &PgPool,
    caller_id: Uuid,
    role: Role,
) -> Result<UserRole, DatabaseError> {
    let sql = format!(
        "INSERT INTO user_roles (id, user_id, role) VALUES ($1, $2, $3) RETURNING {}",
        ROLE_COLUMNS
    );

    sqlx::query_as::<_, UserRole>(&sql)
        .bind(Uuid::new_v4())
        .bind(caller_id)
        .bind(role.as_str())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.code().as_deref() == Some("23505") {
                    return DatabaseError::Conflict(format!("role '{}' already granted", role));
                }
            }
            DatabaseError::Sqlx(e)
        })
}

/// The caller's own role rows.
pub async fn list_own(pool: &PgPool, caller_id: Uuid) -> Result<Vec<UserRole>, DatabaseError> {
    let scope = rule(Table::Roles, Action::Select).sql("$1");
    let sql = format!(
        "SELECT {} FROM user_roles WHERE {} ORDER BY created_at ASC",
        ROLE_COLUMNS, scope
    );

    Ok(sqlx::query_as::<_, UserRole>(&sql)
        .bind(caller_id)
        .fetch_all(pool)
        .await?)
}

/// Effective role for view routing: any handler grant wins; everything
/// else, including a user with no role rows at all, is a submitter.
pub async fn effective_role(pool: &PgPool, user_id: Uuid) -> Result<Role, DatabaseError> {
    let exists: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM user_roles WHERE user_id = $1 AND role = 'handler' LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(if exists.is_some() {
        Role::Handler
    } else {
        Role::Submitter
    })
}
