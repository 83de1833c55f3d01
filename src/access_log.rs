//! Per-request access log.
//!
//! Every request appends `<timestamp> - <METHOD> <path+query>` to a file.
//! The append runs on a detached task: the request never waits for it and a
//! failed write is only reported through tracing.

use axum::extract::{Request, State};
use axum::http::{Method, Uri};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Handle to the access log file. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AccessLog {
    path: Arc<PathBuf>,
}

impl AccessLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build one log line, newline included.
    pub fn format_line(at: DateTime<Utc>, method: &Method, uri: &Uri) -> String {
        let target = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        format!(
            "{} - {} {}\n",
            at.to_rfc3339_opts(SecondsFormat::Millis, true),
            method,
            target
        )
    }

    /// Append a line, creating the file if needed.
    pub async fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.as_path())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }

    /// Record a request without waiting for the write.
    pub fn record(&self, method: &Method, uri: &Uri) {
        let line = Self::format_line(Utc::now(), method, uri);
        let log = self.clone();
        tokio::spawn(async move {
            if let Err(e) = log.append(&line).await {
                tracing::error!(
                    path = %log.path().display(),
                    error = %e,
                    "Failed to write access log"
                );
            }
        });
    }
}

/// Middleware that records each request before it reaches a route.
pub async fn log_request(State(log): State<AccessLog>, request: Request, next: Next) -> Response {
    log.record(request.method(), request.uri());
    next.run(request).await
}
