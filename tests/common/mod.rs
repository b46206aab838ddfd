use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Duration as TokenLifetime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// HS256 verifier key handed to the spawned server; tests mint their own
/// tokens with it.
pub const TEST_VERIFIER_KEY: &str = "integration-test-verifier-key";
pub const TEST_AUDIENCE: &str = "movies-service";
pub const TEST_SCOPE: &str = "movies.read";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/movies-service");
        cmd.env("MOVIES_API_PORT", port.to_string())
            .env("LAB_JWT_PUBLIC_KEY", TEST_VERIFIER_KEY)
            .env("LAB_AUDIENCE", TEST_AUDIENCE)
            .env("LAB_REQUIRED_SCOPE", TEST_SCOPE)
            .env("LAB_DEMO_DATA", "true")
            .env_remove("PORT")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;
        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/actuator/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
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
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Sign a token over an arbitrary claim set with the test verifier key.
pub fn token_with(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_VERIFIER_KEY.as_bytes()),
    )
    .expect("failed to sign test token")
}

/// A token that passes every check the server applies.
pub fn bearer_token() -> String {
    let now = Utc::now();
    token_with(json!({
        "sub": "integration-tests",
        "aud": TEST_AUDIENCE,
        "scope": TEST_SCOPE,
        "iat": now.timestamp(),
        "exp": (now + TokenLifetime::hours(1)).timestamp(),
    }))
}
