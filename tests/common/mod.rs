#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/servicedesk-api");
        cmd.env("DESK_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Consider server ready on any non-404 response
                    if resp.status() == StatusCode::OK
                        || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                    {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    // Use stable get_or_init and convert init errors into a panic with context.
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when the server can actually reach its database. Cases that need
/// storage skip themselves when this is false, so the suite stays green on
/// machines without a local Postgres.
pub async fn db_ready(server: &TestServer) -> bool {
    let client = reqwest::Client::new();
    match client.get(format!("{}/health", server.base_url)).send().await {
        Ok(resp) => resp.status() == StatusCode::OK,
        Err(_) => false,
    }
}

pub struct Session {
    pub token: String,
    pub user_id: String,
    pub name: String,
}

/// Register a fresh identity and return its bearer token.
pub async fn register(base_url: &str, name: &str) -> Result<Session> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&serde_json::json!({ "name": name }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed: {}",
        res.status()
    );

    let body: serde_json::Value = res.json().await?;
    Ok(Session {
        token: body["data"]["token"]
            .as_str()
            .context("token missing from register response")?
            .to_string(),
        user_id: body["data"]["user"]["id"]
            .as_str()
            .context("user id missing from register response")?
            .to_string(),
        name: name.to_string(),
    })
}

/// Self-grant the handler role for an existing session.
pub async fn become_handler(base_url: &str, session: &Session) -> Result<()> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/auth/roles", base_url))
        .bearer_auth(&session.token)
        .json(&serde_json::json!({ "role": "handler" }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "handler grant failed: {}",
        res.status()
    );
    Ok(())
}

/// Create a request as the given session and return its row.
pub async fn create_request(
    base_url: &str,
    session: &Session,
    payload: serde_json::Value,
) -> Result<serde_json::Value> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/requests", base_url))
        .bearer_auth(&session.token)
        .json(&payload)
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "create request failed: {}",
        res.status()
    );
    let body: serde_json::Value = res.json().await?;
    Ok(body["data"].clone())
}
