//! Historical telemetry and its projection into chart points.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::snapshot::TEMPERATURE;

/// Display format for chart x-axis labels (local wall-clock time).
const TIME_FORMAT: &str = "%H:%M:%S";

/// Timestamp layouts without an offset, as produced by Python's `isoformat()`.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One timestamped metric sample from `GET /history`.
///
/// Only `temperature` samples are ever read, so the other fields are decoded
/// leniently: a malformed sample for another metric must not cost the chart
/// its points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub time: String,
    /// Raw value; numeric for well-formed samples.
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wafer_id: Option<String>,
}

/// Body of `GET /history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryPoint>,
}

impl HistoryResponse {
    /// Decode a raw `/history` body.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// A single point on the temperature trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Local display time of the sample.
    pub time: String,
    /// Temperature in °C.
    pub temp: f64,
}

/// Keep only samples tagged exactly `temperature`, in order, and project
/// them to chart points. Temperature samples without a numeric value are
/// skipped.
pub fn chart_points(history: &[HistoryPoint]) -> Vec<ChartPoint> {
    history
        .iter()
        .filter(|point| point.metric == TEMPERATURE)
        .filter_map(|point| {
            Some(ChartPoint {
                time: display_time(&point.time),
                temp: point.value.as_f64()?,
            })
        })
        .collect()
}

/// Convert a serialized timestamp to a local `HH:MM:SS` string.
///
/// Timestamps with an offset are converted to local time; timestamps
/// without one are taken as already local. Anything unparseable is shown
/// verbatim.
pub fn display_time(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Local).format(TIME_FORMAT).to_string();
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return ts.with_timezone(&Local).format(TIME_FORMAT).to_string();
    }
    for layout in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return naive.format(TIME_FORMAT).to_string();
        }
    }

    raw.to_string()
}
