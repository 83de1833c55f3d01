//! Test HTTP client.
//!
//! Thin wrapper over reqwest that returns status and body text together.

use reqwest::StatusCode;
use serde_json::Value;

/// A response reduced to what the tests assert on.
#[allow(dead_code)]
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

/// A test HTTP client bound to one server.
pub struct TestClient {
    http: reqwest::Client,
    base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<TestResponse> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        Self::collect(response).await
    }

    /// POST / with a form-encoded body.
    pub async fn submit_form(&self, fields: &[(&str, &str)]) -> anyhow::Result<TestResponse> {
        let response = self
            .http
            .post(format!("{}/", self.base_url))
            .form(fields)
            .send()
            .await?;
        Self::collect(response).await
    }

    /// POST / with a JSON body.
    pub async fn submit_json(&self, body: &Value) -> anyhow::Result<TestResponse> {
        let response = self
            .http
            .post(format!("{}/", self.base_url))
            .json(body)
            .send()
            .await?;
        Self::collect(response).await
    }

    /// POST / with a raw body and content type.
    pub async fn submit_raw(
        &self,
        content_type: &str,
        body: &'static str,
    ) -> anyhow::Result<TestResponse> {
        let response = self
            .http
            .post(format!("{}/", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        Self::collect(response).await
    }

    async fn collect(response: reqwest::Response) -> anyhow::Result<TestResponse> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        Ok(TestResponse {
            status,
            content_type,
            body,
        })
    }
}
