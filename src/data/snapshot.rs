//! Latest-reading snapshot as served by `GET /latest`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metric key for the chamber temperature, in °C.
pub const TEMPERATURE: &str = "temperature";

/// The most recent telemetry reading for the monitored tool.
///
/// The backend builds this from the last point it holds, so any field may be
/// missing (e.g. `{"error": "No data found in the last hour"}` decodes to an
/// empty snapshot).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub wafer_id: Option<String>,
    #[serde(default)]
    pub tool_id: Option<String>,
    /// Metric name to raw value, e.g. `temperature`, `pressure`. Values
    /// are kept as JSON so a non-numeric metric does not void the reading.
    #[serde(default)]
    pub metrics: BTreeMap<String, serde_json::Value>,
}

impl Snapshot {
    /// Decode a raw `/latest` body.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Chamber temperature, if the reading carried one.
    pub fn temperature(&self) -> Option<f64> {
        self.metrics.get(TEMPERATURE).and_then(serde_json::Value::as_f64)
    }

    /// Health derived from the status label.
    pub fn health(&self) -> ToolHealth {
        self.status.as_deref().map(ToolHealth::from_status).unwrap_or(ToolHealth::Unknown)
    }
}

/// Coarse tool health, used to tint the status card and header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolHealth {
    Nominal,
    Critical,
    Unknown,
}

impl ToolHealth {
    /// `NOMINAL` is nominal, anything mentioning `CRITICAL` (e.g.
    /// `CRITICAL_OVERHEAT`) is critical.
    pub fn from_status(status: &str) -> Self {
        let status = status.trim().to_ascii_uppercase();
        if status == "NOMINAL" {
            ToolHealth::Nominal
        } else if status.contains("CRITICAL") {
            ToolHealth::Critical
        } else {
            ToolHealth::Unknown
        }
    }
}
