use servicedesk_api::database::manager::DatabaseManager;
use servicedesk_api::feed::ChangeFeed;
use servicedesk_api::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Service Desk API in {:?} mode", config.environment);

    // Missing configuration is fatal at startup, not recoverable at runtime
    if config.security.jwt_secret.is_empty() {
        eprintln!("JWT_SECRET must be set outside the development profile");
        std::process::exit(1);
    }

    let pool = match DatabaseManager::connect().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // Schema bootstrap needs a reachable database; when it is down we stay
    // up degraded and retry nothing, health reports the condition.
    if let Err(e) = DatabaseManager::ensure_schema(&pool).await {
        tracing::warn!("could not apply schema at startup: {}", e);
    }

    let state = AppState {
        pool,
        feed: ChangeFeed::new(config.feed.channel_capacity),
    };

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("DESK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Service Desk API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
