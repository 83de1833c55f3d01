//! Test server management.
//!
//! Spawns and manages contactd instances for integration testing.

use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    data_dir: TempDir,
}

impl TestServer {
    /// Spawn a new test server on a free port with a file-backed database.
    pub async fn spawn() -> anyhow::Result<Self> {
        let data_dir = tempfile::Builder::new().prefix("contactd-test-").tempdir()?;
        let port = free_port()?;

        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
listen = "127.0.0.1:{}"

[database]
path = "{}"

[access_log]
path = "{}"
"#,
            port,
            data_dir.path().join("contacts.db").display(),
            data_dir.path().join("access.log").display(),
        );
        std::fs::write(&config_path, config_content)?;

        // Spawn from inside the data dir so nothing lands in the source tree.
        let child = Command::new(env!("CARGO_BIN_EXE_contactd"))
            .arg(&config_path)
            .current_dir(data_dir.path())
            .env("RUST_LOG", "warn")
            .spawn()?;

        let server = Self {
            child,
            port,
            data_dir,
        };

        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Create a new HTTP client for this server.
    pub fn client(&self) -> super::client::TestClient {
        super::client::TestClient::new(self.base_url())
    }

    pub fn access_log_path(&self) -> PathBuf {
        self.data_dir.path().join("access.log")
    }

    #[allow(dead_code)]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Read the access log once it holds at least `expected` lines.
    ///
    /// Log writes are detached from responses, so poll briefly.
    #[allow(dead_code)]
    pub async fn access_log_lines(&self, expected: usize) -> anyhow::Result<Vec<String>> {
        let path = self.access_log_path();
        let mut lines = Vec::new();
        for _ in 0..50 {
            if let Ok(content) = tokio::fs::read_to_string(&path).await {
                lines = content.lines().map(str::to_string).collect();
                if lines.len() >= expected {
                    // One more beat to catch any extra lines.
                    sleep(Duration::from_millis(100)).await;
                    let content = tokio::fs::read_to_string(&path).await?;
                    return Ok(content.lines().map(str::to_string).collect());
                }
            }
            sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!(
            "access log has {} lines, expected at least {}",
            lines.len(),
            expected
        )
    }
}

/// Ask the OS for an unused port.
fn free_port() -> anyhow::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process; the TempDir removes the data directory.
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
