//! Safety-interlock quarantine log as served by `GET /quarantine`.

use serde::{Deserialize, Serialize};

use super::history::display_time;

/// A wafer quarantined after a safety interlock fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarantineEntry {
    pub id: i64,
    pub wafer_id: String,
    pub tool_id: String,
    pub metric_name: String,
    pub violation_value: f64,
    #[serde(default)]
    pub threshold_limit: Option<f64>,
    pub timestamp: String,
    #[serde(default)]
    pub is_cleared: bool,
}

impl QuarantineEntry {
    /// Local display time of the violation.
    pub fn display_time(&self) -> String {
        display_time(&self.timestamp)
    }
}

/// Decode a raw `/quarantine` body (newest first, as the backend orders it).
pub fn decode_entries(value: serde_json::Value) -> serde_json::Result<Vec<QuarantineEntry>> {
    serde_json::from_value(value)
}

/// Number of entries an engineer has not cleared yet.
pub fn open_count(entries: &[QuarantineEntry]) -> usize {
    entries.iter().filter(|e| !e.is_cleared).count()
}
