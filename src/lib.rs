pub mod auth;
pub mod classifier;
pub mod config;
pub mod database;
pub mod error;
pub mod feed;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod policy;
pub mod types;

use axum::extract::State;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::manager::DatabaseManager;
use crate::feed::ChangeFeed;

/// Shared per-process context: created once at startup, handed to every
/// handler through axum state, dropped on shutdown. Nothing in here is a
/// global.
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub feed: ChangeFeed,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes())
        // Protected API behind JWT extraction
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router<AppState> {
    use handlers::protected::{auth, comments, feed, requests};

    Router::new()
        // Session introspection and role self-service
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/roles", get(auth::roles_get).post(auth::roles_post))
        // Requests (collection + record)
        .route("/api/requests", get(requests::list).post(requests::create))
        .route(
            "/api/requests/:id",
            get(requests::fetch)
                .patch(requests::patch)
                .delete(requests::remove),
        )
        // Discussion threads
        .route(
            "/api/requests/:id/comments",
            get(comments::list).post(comments::create),
        )
        // Live-refresh stream
        .route("/api/feed", get(feed::subscribe))
        .layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Service Desk API",
            "version": version,
            "description": "Department request tracking backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/register, /auth/login (public - token acquisition)",
                "auth": "/api/auth/* (protected - identity and roles)",
                "requests": "/api/requests[/:id] (protected)",
                "comments": "/api/requests/:id/comments (protected)",
                "feed": "/api/feed (protected - SSE change notifications)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
