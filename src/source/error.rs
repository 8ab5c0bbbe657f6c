//! The one error kind the telemetry client reports.

use thiserror::Error;

/// A request to the telemetry API did not produce a usable body.
///
/// Covers connection failures, non-success HTTP statuses and unreadable
/// bodies alike. Callers only ever log it.
#[derive(Debug, Clone, Error)]
#[error("request failed: {reason}")]
pub struct RequestFailed {
    reason: String,
}

impl RequestFailed {
    /// Create an error with a free-form reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The API answered with a non-success status.
    pub fn status(url: &str, status: reqwest::StatusCode) -> Self {
        Self::new(format!("{} returned status {}", url, status))
    }

    /// Human-readable cause.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<reqwest::Error> for RequestFailed {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestFailed::new(format!("timed out: {}", err))
        } else if err.is_connect() {
            RequestFailed::new(format!("connection failed: {}", err))
        } else {
            RequestFailed::new(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RequestFailed {
    fn from(err: serde_json::Error) -> Self {
        RequestFailed::new(format!("unexpected response body: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = RequestFailed::status("http://host/api/v1/latest", reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            "request failed: http://host/api/v1/latest returned status 502 Bad Gateway"
        );
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RequestFailed::from(json_err);
        assert!(err.reason().starts_with("unexpected response body"));
    }
}
