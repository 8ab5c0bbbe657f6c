//! HTTP implementation of the telemetry API.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;

use super::{RequestFailed, TelemetryApi};

/// Telemetry client talking to the backend over plain HTTP.
///
/// Paths are appended to a fixed base URL (e.g.
/// `http://localhost:8000/api/v1`). There are no retries and no timeout
/// beyond the transport default.
#[derive(Debug, Clone)]
pub struct HttpTelemetryClient {
    client: Client,
    base_url: String,
}

impl HttpTelemetryClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Returns the base URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn request(&self, method: Method, path: &str) -> Result<Value, RequestFailed> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let response = self.client.request(method.clone(), &url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailed::status(&url, status));
        }

        let body = response.text().await?;
        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());

        decode_body(&body)
    }
}

/// Parse a response body, treating an empty body as JSON `null`.
fn decode_body(body: &str) -> Result<Value, RequestFailed> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl TelemetryApi for HttpTelemetryClient {
    async fn get_latest(&self) -> Result<Value, RequestFailed> {
        self.request(Method::GET, "latest").await
    }

    async fn get_history(&self) -> Result<Value, RequestFailed> {
        self.request(Method::GET, "history").await
    }

    async fn get_quarantine_logs(&self) -> Result<Value, RequestFailed> {
        self.request(Method::GET, "quarantine").await
    }

    async fn reset_system(&self) -> Result<Value, RequestFailed> {
        self.request(Method::POST, "system/reset").await
    }

    fn description(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    /// Port 1 is reserved and unbound, so connections are always refused.
    const UNREACHABLE_URL: &str = "http://127.0.0.1:1/api/v1";

    /// Serve a fake backend on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api/v1", addr)
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/v1/latest",
                get(|| async {
                    Json(json!({
                        "status": "NOMINAL",
                        "wafer_id": "WFR-0007",
                        "metrics": { "temperature": 181.3 }
                    }))
                }),
            )
            .route(
                "/api/v1/history",
                get(|| async { Json(json!({ "history": [] })) }),
            )
            .route(
                "/api/v1/quarantine",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db down") }),
            )
            .route("/api/v1/system/reset", post(|| async { StatusCode::OK }))
    }

    #[test]
    fn test_url_joining() {
        let client = HttpTelemetryClient::new("http://localhost:8000/api/v1/");
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(client.url("history"), "http://localhost:8000/api/v1/history");
        assert_eq!(client.url("/system/reset"), "http://localhost:8000/api/v1/system/reset");
        assert_eq!(client.description(), "http://localhost:8000/api/v1");
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body("").unwrap(), Value::Null);
        assert_eq!(decode_body("{\"a\":1}").unwrap(), json!({ "a": 1 }));
        assert!(decode_body("<html>").is_err());
    }

    #[tokio::test]
    async fn test_success_returns_body_verbatim() {
        let client = HttpTelemetryClient::new(serve(backend()).await);

        let latest = client.get_latest().await.unwrap();
        assert_eq!(
            latest,
            json!({
                "status": "NOMINAL",
                "wafer_id": "WFR-0007",
                "metrics": { "temperature": 181.3 }
            })
        );

        let history = client.get_history().await.unwrap();
        assert_eq!(history, json!({ "history": [] }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_request_failed() {
        let client = HttpTelemetryClient::new(serve(backend()).await);

        let err = client.get_quarantine_logs().await.unwrap_err();
        assert!(err.reason().contains("500"), "{}", err);
    }

    #[tokio::test]
    async fn test_missing_route_is_request_failed() {
        let client = HttpTelemetryClient::new(serve(Router::new()).await);

        let err = client.get_history().await.unwrap_err();
        assert!(err.reason().contains("404"), "{}", err);
    }

    #[tokio::test]
    async fn test_reset_with_empty_body() {
        let client = HttpTelemetryClient::new(serve(backend()).await);
        assert_eq!(client.reset_system().await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_failed() {
        let client = HttpTelemetryClient::new(UNREACHABLE_URL);
        let err = client.get_latest().await.unwrap_err();
        assert!(err.to_string().starts_with("request failed:"), "{}", err);
    }
}
