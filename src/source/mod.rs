//! Telemetry API access and periodic polling.
//!
//! This module provides a trait-based abstraction over the backend's
//! telemetry endpoints ([`TelemetryApi`]), its HTTP implementation, and the
//! [`Poller`] that turns a fetch into a cancellable fixed-period feed.

mod error;
mod http;
mod poller;

pub use error::RequestFailed;
pub use http::HttpTelemetryClient;
pub use poller::{Poller, Schedule};

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

/// Endpoints of the telemetry backend.
///
/// Every method issues a single request and returns the parsed JSON body
/// verbatim; interpreting its shape is up to the caller. Any failure is a
/// [`RequestFailed`].
///
/// # Example
///
/// ```no_run
/// use fabwatch::{HttpTelemetryClient, TelemetryApi};
///
/// # tokio_test::block_on(async {
/// let client = HttpTelemetryClient::new("http://localhost:8000/api/v1");
/// match client.get_latest().await {
///     Ok(body) => println!("latest: {}", body),
///     Err(e) => eprintln!("{}", e),
/// }
/// # });
/// ```
#[async_trait]
pub trait TelemetryApi: Send + Sync + Debug {
    /// `GET /latest`: the most recent reading.
    async fn get_latest(&self) -> Result<Value, RequestFailed>;

    /// `GET /history`: recent samples for all metrics.
    async fn get_history(&self) -> Result<Value, RequestFailed>;

    /// `GET /quarantine`: the safety-interlock audit trail.
    async fn get_quarantine_logs(&self) -> Result<Value, RequestFailed>;

    /// `POST /system/reset`: clear the interlock state.
    async fn reset_system(&self) -> Result<Value, RequestFailed>;

    /// Returns a human-readable description of the backend.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;
}
