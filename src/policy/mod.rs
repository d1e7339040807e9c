//! Row-level authorization policy set.
//!
//! One rule per (table, operation), kept as a static table so the whole
//! policy surface is visible in one place. Each predicate renders to a SQL
//! fragment that the store layer embeds directly in its statements: SELECTs
//! are scoped, UPDATE/DELETE are guarded in the WHERE clause, and the
//! comment INSERT runs as INSERT ... SELECT against the parent-visibility
//! check. Enforcement is therefore atomic with the query itself; there is
//! no application-side check that could drift from what executes.
//!
//! The same predicates evaluate in memory against (caller, row facts),
//! which is what the unit tests exercise.

use std::collections::HashSet;

use uuid::Uuid;

use crate::types::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Requests,
    Comments,
    Roles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert,
    Select,
    Update,
    Delete,
}

/// Authorization predicate over (caller identity, caller roles, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The named row column equals the caller id.
    Owner(&'static str),
    /// The caller holds the handler role.
    Handler,
    /// Owner of the named column, or handler.
    OwnerOrHandler(&'static str),
    /// Comment author is the caller and the parent request is visible to
    /// them. The author half is satisfied by construction: the store binds
    /// the caller id as user_id.
    AuthorOnVisibleParent,
    /// The parent request is visible to the caller.
    VisibleParent,
    /// No grant path exists for this operation.
    Deny,
}

/// The complete policy surface. Roles have no update or delete path:
/// a grant cannot be self-revoked or escalated through this interface.
pub const RULES: &[(Table, Action, Predicate)] = &[
    (Table::Requests, Action::Insert, Predicate::Owner("submitter_id")),
    (Table::Requests, Action::Select, Predicate::OwnerOrHandler("submitter_id")),
    (Table::Requests, Action::Update, Predicate::Handler),
    (Table::Requests, Action::Delete, Predicate::Handler),
    (Table::Comments, Action::Insert, Predicate::AuthorOnVisibleParent),
    (Table::Comments, Action::Select, Predicate::VisibleParent),
    (Table::Comments, Action::Update, Predicate::Deny),
    (Table::Comments, Action::Delete, Predicate::Deny),
    (Table::Roles, Action::Insert, Predicate::Owner("user_id")),
    (Table::Roles, Action::Select, Predicate::Owner("user_id")),
    (Table::Roles, Action::Update, Predicate::Deny),
    (Table::Roles, Action::Delete, Predicate::Deny),
];

/// Look up the predicate for a table/operation pair. Unlisted pairs deny.
pub fn rule(table: Table, action: Action) -> Predicate {
    RULES
        .iter()
        .find(|(t, a, _)| *t == table && *a == action)
        .map(|(_, _, predicate)| *predicate)
        .unwrap_or(Predicate::Deny)
}

fn handler_exists(uid: &str) -> String {
    format!(
        "EXISTS (SELECT 1 FROM user_roles ur WHERE ur.user_id = {} AND ur.role = 'handler')",
        uid
    )
}

impl Predicate {
    /// Render the predicate as a SQL fragment for statements on the target
    /// table. `uid` is the bind placeholder carrying the caller id (e.g.
    /// "$1"). Correlated columns resolve against the target table, so this
    /// form is used in SELECT/UPDATE/DELETE WHERE clauses.
    pub fn sql(&self, uid: &str) -> String {
        match self {
            Predicate::Owner(column) => format!("{} = {}", column, uid),
            Predicate::Handler => handler_exists(uid),
            Predicate::OwnerOrHandler(column) => {
                format!("({} = {} OR {})", column, uid, handler_exists(uid))
            }
            Predicate::AuthorOnVisibleParent | Predicate::VisibleParent => format!(
                "EXISTS (SELECT 1 FROM requests parent WHERE parent.id = request_comments.request_id AND (parent.submitter_id = {} OR {}))",
                uid,
                handler_exists(uid)
            ),
            Predicate::Deny => "FALSE".to_string(),
        }
    }

    /// Pure evaluation for tests and reasoning; mirrors `sql` exactly.
    pub fn allows(&self, ctx: &PolicyContext, row: &RowFacts) -> bool {
        match self {
            Predicate::Owner(_) => row.owner_id == Some(ctx.uid),
            Predicate::Handler => ctx.is_handler(),
            Predicate::OwnerOrHandler(_) => row.owner_id == Some(ctx.uid) || ctx.is_handler(),
            Predicate::AuthorOnVisibleParent => {
                row.author_id == Some(ctx.uid)
                    && (row.parent_owner_id == Some(ctx.uid) || ctx.is_handler())
            }
            Predicate::VisibleParent => {
                row.parent_owner_id == Some(ctx.uid) || ctx.is_handler()
            }
            Predicate::Deny => false,
        }
    }
}

/// Parent-visibility guard for comment insertion, where the new row does
/// not exist yet. `parent` is the bind placeholder carrying the request id.
pub fn parent_visible_sql(uid: &str, parent: &str) -> String {
    format!(
        "EXISTS (SELECT 1 FROM requests parent WHERE parent.id = {} AND (parent.submitter_id = {} OR {}))",
        parent,
        uid,
        handler_exists(uid)
    )
}

/// Caller identity and role memberships, as seen by the policy.
#[derive(Debug, Clone)]
pub struct PolicyContext {
    pub uid: Uuid,
    pub roles: HashSet<Role>,
}

impl PolicyContext {
    pub fn new(uid: Uuid, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            uid,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn is_handler(&self) -> bool {
        self.roles.contains(&Role::Handler)
    }
}

/// The row attributes the predicates inspect.
#[derive(Debug, Clone, Default)]
pub struct RowFacts {
    /// requests.submitter_id or user_roles.user_id
    pub owner_id: Option<Uuid>,
    /// request_comments.user_id
    pub author_id: Option<Uuid>,
    /// submitter_id of the comment's parent request
    pub parent_owner_id: Option<Uuid>,
}
