//! Scripted telemetry backend for pipeline tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::source::{RequestFailed, TelemetryApi};

type Script = Mutex<VecDeque<Result<Value, RequestFailed>>>;

/// Answers each endpoint from its own queue of scripted responses; an
/// exhausted queue answers with a failure.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    latest: Script,
    history: Script,
    quarantine: Script,
    reset: Script,
    pub latest_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub quarantine_calls: AtomicUsize,
    pub reset_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest(self, responses: Vec<Result<Value, RequestFailed>>) -> Self {
        self.latest.lock().unwrap().extend(responses);
        self
    }

    pub fn with_history(self, responses: Vec<Result<Value, RequestFailed>>) -> Self {
        self.history.lock().unwrap().extend(responses);
        self
    }

    pub fn with_quarantine(self, responses: Vec<Result<Value, RequestFailed>>) -> Self {
        self.quarantine.lock().unwrap().extend(responses);
        self
    }

    pub fn with_reset(self, responses: Vec<Result<Value, RequestFailed>>) -> Self {
        self.reset.lock().unwrap().extend(responses);
        self
    }

    fn answer(script: &Script, calls: &AtomicUsize) -> Result<Value, RequestFailed> {
        calls.fetch_add(1, Ordering::SeqCst);
        script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RequestFailed::new("no scripted response")))
    }
}

#[async_trait]
impl TelemetryApi for FakeApi {
    async fn get_latest(&self) -> Result<Value, RequestFailed> {
        Self::answer(&self.latest, &self.latest_calls)
    }

    async fn get_history(&self) -> Result<Value, RequestFailed> {
        Self::answer(&self.history, &self.history_calls)
    }

    async fn get_quarantine_logs(&self) -> Result<Value, RequestFailed> {
        Self::answer(&self.quarantine, &self.quarantine_calls)
    }

    async fn reset_system(&self) -> Result<Value, RequestFailed> {
        Self::answer(&self.reset, &self.reset_calls)
    }

    fn description(&self) -> &str {
        "fake"
    }
}

pub(crate) fn failed() -> Result<Value, RequestFailed> {
    Err(RequestFailed::new("backend unavailable"))
}

pub(crate) fn latest_body(status: &str, wafer: &str, temperature: f64) -> Result<Value, RequestFailed> {
    Ok(json!({
        "tool_id": "ETCH-001",
        "status": status,
        "wafer_id": wafer,
        "metrics": { "temperature": temperature, "pressure": 10.0 }
    }))
}

/// A `/history` body with one temperature and one pressure sample per value.
pub(crate) fn history_body(temperatures: &[f64]) -> Result<Value, RequestFailed> {
    let history: Vec<Value> = temperatures
        .iter()
        .enumerate()
        .flat_map(|(i, temp)| {
            let time = format!("2024-01-01T00:00:{:02}Z", i);
            [
                json!({ "metric": "temperature", "time": time, "value": temp }),
                json!({ "metric": "pressure", "time": time, "value": 10.0 }),
            ]
        })
        .collect();
    Ok(json!({ "history": history }))
}

pub(crate) fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
