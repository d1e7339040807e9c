use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection management and schema bootstrap for the single service
/// database. The pool is created once at startup and handed to the
/// application state; nothing here is a process-wide singleton.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the connection pool against DATABASE_URL. Absence of the URL is
    /// a fatal startup condition, surfaced to the caller; an unreachable
    /// database is not. Connections are established lazily, so the server
    /// can come up degraded and report 503 from /health.
    pub async fn connect() -> Result<PgPool, DatabaseError> {
        let url = database_url()?;
        let cfg = &config::config().database;

        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .connect_lazy(&url)?;

        info!("Configured database pool ({} max connections)", cfg.max_connections);
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Apply the schema. Idempotent; safe to run at every startup.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in SCHEMA_DDL {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Schema ensured ({} statements)", SCHEMA_DDL.len());
        Ok(())
    }
}

/// Read and validate DATABASE_URL.
fn database_url() -> Result<String, DatabaseError> {
    let raw = std::env::var("DATABASE_URL")
        .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let parsed = url::Url::parse(&raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if parsed.scheme() != "postgres" && parsed.scheme() != "postgresql" {
        return Err(DatabaseError::InvalidDatabaseUrl);
    }

    Ok(raw)
}

/// Storage contract: three tables, TEXT-typed enums constrained by CHECK,
/// cascade from requests to their comments, one role row per (user, role).
const SCHEMA_DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS requests (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT NOT NULL,
        priority TEXT NOT NULL CHECK (priority IN ('Low', 'Medium', 'High', 'Critical')),
        status TEXT NOT NULL DEFAULT 'Received' CHECK (status IN ('Received', 'In Progress', 'Resolved')),
        submitter_id UUID NOT NULL,
        submitter_name TEXT NOT NULL,
        assigned_unit TEXT NOT NULL,
        assigned_handler TEXT,
        ai_response TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        resolved_at TIMESTAMPTZ,
        deadline TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS request_comments (
        id UUID PRIMARY KEY,
        request_id UUID NOT NULL REFERENCES requests(id) ON DELETE CASCADE,
        user_id UUID NOT NULL,
        user_name TEXT NOT NULL,
        comment TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS user_roles (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('submitter', 'handler')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, role)
    )",
    "CREATE INDEX IF NOT EXISTS idx_requests_submitter ON requests (submitter_id)",
    "CREATE INDEX IF NOT EXISTS idx_requests_created ON requests (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_request_comments_request ON request_comments (request_id)",
    "CREATE INDEX IF NOT EXISTS idx_user_roles_user ON user_roles (user_id)",
];
