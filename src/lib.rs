//! # fabwatch
//!
//! A live terminal dashboard for a semiconductor fab tool's telemetry API.
//!
//! The dashboard polls a REST backend for the tool's latest reading, its
//! temperature history and the interlock quarantine log, and renders them as
//! status cards, a trend chart and a table. It is a pure reader: the only
//! write is an operator-confirmed system reset.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (decode) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── Poller ◀── HttpTelemetryClient ◀── REST API │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, reset and export
//! - **[`source`]**: The [`TelemetryApi`] trait, its HTTP client and the
//!   cancellable [`Poller`]
//! - **[`data`]**: Response types and the chart transform
//! - **[`yield_chart`]**: The temperature chart and its own history poller
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered startup settings
//!
//! Polls never surface errors on screen: a failed request is logged and the
//! last good data stays visible.
//!
//! ## Usage
//!
//! ```bash
//! # Against the default backend (http://localhost:8000/api/v1)
//! fabwatch
//!
//! # Another backend, faster history refresh
//! GREENFIELD_API_BASE_URL=http://fab-gateway:8000/api/v1 fabwatch --history-interval 2s
//!
//! # One-shot JSON export
//! fabwatch --export state.json
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use fabwatch::{App, HttpTelemetryClient, Settings};
//!
//! # tokio_test::block_on(async {
//! let settings = Settings::default();
//! let client = Arc::new(HttpTelemetryClient::new(&settings.api_base_url));
//! let mut app = App::new(client, &settings).unwrap();
//! app.tick();
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod source;
pub mod ui;
pub mod yield_chart;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{ChartPoint, HistoryPoint, HistoryResponse, QuarantineEntry, Snapshot, ToolHealth};
pub use source::{HttpTelemetryClient, Poller, RequestFailed, Schedule, TelemetryApi};
pub use yield_chart::YieldChart;
