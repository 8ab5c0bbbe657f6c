//! Data models for the telemetry API and their display projections.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing of interval strings (e.g., "2s", "300ms") and age formatting
//! - [`snapshot`]: The latest reading ([`Snapshot`]) and derived [`ToolHealth`]
//! - [`history`]: History samples and the temperature-only [`ChartPoint`] projection
//! - [`quarantine`]: Safety-interlock quarantine log entries
//!
//! ## Data Flow
//!
//! ```text
//! GET /latest  (raw JSON) ──▶ Snapshot::from_value() ──▶ status cards
//!
//! GET /history (raw JSON) ──▶ HistoryResponse::from_value()
//!                                     │
//!                                     ▼
//!                              chart_points()  (metric == "temperature")
//!                                     │
//!                                     ▼
//!                               Vec<ChartPoint> ──▶ yield chart
//! ```

pub mod duration;
pub mod history;
pub mod quarantine;
pub mod snapshot;

pub use history::{chart_points, ChartPoint, HistoryPoint, HistoryResponse};
pub use quarantine::QuarantineEntry;
pub use snapshot::{Snapshot, ToolHealth};
