//! Application state and navigation logic.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{info, warn};

use crate::config::{ChartSettings, Settings};
use crate::data::quarantine::decode_entries;
use crate::data::{chart_points, ChartPoint, HistoryResponse, QuarantineEntry, Snapshot};
use crate::source::{Poller, RequestFailed, Schedule, TelemetryApi};
use crate::ui::{StatusCard, Theme};
use crate::yield_chart::YieldChart;

/// How long a status-bar message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Event poll timeout when nothing on screen is moving.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Event poll timeout during the chart transition (about 60 fps).
const ANIMATION_POLL: Duration = Duration::from_millis(16);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Status cards and the temperature trend.
    Dashboard,
    /// Wafers held by the safety interlock.
    Quarantine,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Quarantine,
            View::Quarantine => View::Dashboard,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views: previous and next coincide.
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Quarantine => "Quarantine",
        }
    }
}

/// Main application state.
///
/// Owns one poller per backend resource. Dropping the app drops the
/// pollers, which stops every timer.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_reset_confirm: bool,

    client: Arc<dyn TelemetryApi>,

    // Latest reading, polled on a fixed period with no request at mount
    latest_poller: Poller<Snapshot>,
    pub snapshot: Option<Snapshot>,

    pub yield_chart: YieldChart,

    quarantine_poller: Poller<Vec<QuarantineEntry>>,
    pub quarantine: Option<Vec<QuarantineEntry>>,
    pub selected_entry: usize,

    pending_reset: Option<oneshot::Receiver<Result<Value, RequestFailed>>>,
    last_updated: Option<Instant>,

    // UI
    pub chart_settings: ChartSettings,
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Mount the app against `client` and start polling.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(client: Arc<dyn TelemetryApi>, settings: &Settings) -> Result<Self> {
        Self::with_theme(client, settings, Theme::auto_detect())
    }

    /// Like [`App::new`] with an explicit theme.
    pub fn with_theme(
        client: Arc<dyn TelemetryApi>,
        settings: &Settings,
        theme: Theme,
    ) -> Result<Self> {
        let intervals = settings.intervals()?;
        let transition = settings.chart.transition()?;

        let latest_poller = {
            let client = client.clone();
            Poller::spawn("latest", Schedule::every(intervals.latest), move || {
                let client = client.clone();
                async move {
                    let body = client.get_latest().await?;
                    Ok::<_, RequestFailed>(Snapshot::from_value(body)?)
                }
            })
        };

        let quarantine_poller = {
            let client = client.clone();
            Poller::spawn(
                "quarantine",
                Schedule::immediately_then_every(intervals.quarantine),
                move || {
                    let client = client.clone();
                    async move {
                        let body = client.get_quarantine_logs().await?;
                        Ok::<_, RequestFailed>(decode_entries(body)?)
                    }
                },
            )
        };

        let yield_chart = YieldChart::mount(client.clone(), intervals.history, transition);

        info!(source = client.description(), "dashboard mounted");

        Ok(Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            show_reset_confirm: false,
            client,
            latest_poller,
            snapshot: None,
            yield_chart,
            quarantine_poller,
            quarantine: None,
            selected_entry: 0,
            pending_reset: None,
            last_updated: None,
            chart_settings: settings.chart.clone(),
            theme,
            status_message: None,
        })
    }

    /// Apply whatever the pollers delivered since the last call.
    ///
    /// Non-blocking. Returns true if any displayed data changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        if let Some(snapshot) = self.latest_poller.poll() {
            self.snapshot = Some(snapshot);
            changed = true;
        }

        if self.yield_chart.update() {
            changed = true;
        }

        if let Some(entries) = self.quarantine_poller.poll() {
            if self.selected_entry >= entries.len() {
                self.selected_entry = entries.len().saturating_sub(1);
            }
            self.quarantine = Some(entries);
            changed = true;
        }

        if changed {
            self.last_updated = Some(Instant::now());
        }

        self.check_reset();
        changed
    }

    /// When any poller last delivered data.
    pub fn last_updated(&self) -> Option<Instant> {
        self.last_updated
    }

    /// How long the render loop may wait for input before redrawing.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        if self.current_view == View::Dashboard && self.yield_chart.is_animating(now) {
            ANIMATION_POLL
        } else {
            IDLE_POLL
        }
    }

    /// The three dashboard cards for the current snapshot.
    pub fn status_cards(&self) -> [StatusCard; 3] {
        status_cards(self.snapshot.as_ref())
    }

    /// Returns a description of the backend.
    pub fn source_description(&self) -> &str {
        self.client.description()
    }

    /// Send every request now instead of waiting for the next tick.
    pub fn refresh_all(&mut self) {
        self.latest_poller.refresh_now();
        self.yield_chart.refresh_now();
        self.quarantine_poller.refresh_now();
        self.set_status_message("Refreshing...".to_string());
    }

    /// Ask the operator to confirm a system reset.
    pub fn request_reset(&mut self) {
        self.show_reset_confirm = true;
    }

    /// Dismiss the reset dialog without resetting.
    pub fn cancel_reset(&mut self) {
        self.show_reset_confirm = false;
    }

    /// Send the reset request on a background task.
    ///
    /// The outcome is picked up by [`App::tick`].
    pub fn confirm_reset(&mut self) {
        self.show_reset_confirm = false;
        if self.pending_reset.is_some() {
            self.set_status_message("Reset already in progress".to_string());
            return;
        }

        info!("system reset requested");
        let client = self.client.clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(client.reset_system().await);
        });
        self.pending_reset = Some(rx);
        self.set_status_message("Resetting...".to_string());
    }

    fn check_reset(&mut self) {
        let Some(rx) = self.pending_reset.as_mut() else {
            return;
        };

        match rx.try_recv() {
            Ok(Ok(_)) => {
                info!("system reset acknowledged");
                self.pending_reset = None;
                self.set_status_message("System reset acknowledged".to_string());
                self.latest_poller.refresh_now();
                self.quarantine_poller.refresh_now();
            }
            Ok(Err(e)) => {
                warn!(error = %e, "system reset failed");
                self.pending_reset = None;
                self.set_status_message(format!("Reset failed: {}", e.reason()));
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                self.pending_reset = None;
            }
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    fn entry_count(&self) -> usize {
        self.quarantine.as_ref().map(Vec::len).unwrap_or(0)
    }

    /// Move the quarantine selection down by n rows.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.entry_count().saturating_sub(1);
        self.selected_entry = (self.selected_entry + n).min(max);
    }

    /// Move the quarantine selection up by n rows.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_entry = self.selected_entry.saturating_sub(n);
    }

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one row.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Jump to the newest entry.
    pub fn select_first(&mut self) {
        self.selected_entry = 0;
    }

    /// Jump to the oldest entry.
    pub fn select_last(&mut self) {
        self.selected_entry = self.entry_count().saturating_sub(1);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export what is currently displayed to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let cards = self.status_cards();
        let document = export_document(
            self.source_description(),
            Some(&cards),
            Some(self.yield_chart.points()),
            self.quarantine.as_deref(),
        );
        write_export(path, &document)
    }
}

/// Cards for a snapshot, with fallbacks while none has arrived.
///
/// An empty status or wafer string counts as absent.
pub fn status_cards(snapshot: Option<&Snapshot>) -> [StatusCard; 3] {
    let status = snapshot
        .and_then(|s| s.status.as_deref())
        .filter(|s| !s.is_empty());
    let tool_status = match (status, snapshot) {
        (Some(status), Some(snapshot)) => {
            StatusCard::new("Tool Status", status).with_health(snapshot.health())
        }
        _ => StatusCard::placeholder("Tool Status", "CONNECTING..."),
    };

    let wafer = match snapshot.and_then(|s| s.wafer_id.as_deref()).filter(|w| !w.is_empty()) {
        Some(wafer) => StatusCard::new("Current Wafer", wafer),
        None => StatusCard::placeholder("Current Wafer", "---"),
    };

    let temperature = match snapshot {
        None => StatusCard::placeholder("Chamber Temp", "0 °C"),
        Some(snapshot) => match snapshot.temperature() {
            Some(t) => StatusCard::new("Chamber Temp", format!("{} °C", t)),
            None => StatusCard::placeholder("Chamber Temp", "--- °C"),
        },
    };

    [tool_status, wafer, temperature]
}

/// Build the export document. A `None` section is written as `null`.
pub fn export_document(
    source: &str,
    cards: Option<&[StatusCard]>,
    chart: Option<&[ChartPoint]>,
    quarantine: Option<&[QuarantineEntry]>,
) -> Value {
    let cards = cards.map(|cards| {
        cards
            .iter()
            .map(|card| {
                json!({
                    "title": card.title,
                    "value": card.value,
                    "placeholder": card.placeholder
                })
            })
            .collect::<Vec<_>>()
    });

    json!({
        "source": source,
        "exported_at": chrono::Local::now().to_rfc3339(),
        "cards": cards,
        "chart": chart,
        "quarantine": quarantine
    })
}

/// Fetch every resource once and build the export document.
///
/// Failed fetches are logged and exported as `null`.
pub async fn fetch_export(client: &dyn TelemetryApi) -> Value {
    let (latest, history, quarantine) = tokio::join!(
        client.get_latest(),
        client.get_history(),
        client.get_quarantine_logs()
    );

    let snapshot = latest.and_then(|body| Ok(Snapshot::from_value(body)?));
    let chart = history
        .and_then(|body| Ok(HistoryResponse::from_value(body)?))
        .map(|response| chart_points(&response.history));
    let entries = quarantine.and_then(|body| Ok(decode_entries(body)?));

    let cards = logged("latest", snapshot).map(|snapshot| status_cards(Some(&snapshot)));
    let chart = logged("history", chart);
    let entries = logged("quarantine", entries);

    export_document(
        client.description(),
        cards.as_ref().map(|c| c.as_slice()),
        chart.as_deref(),
        entries.as_deref(),
    )
}

fn logged<T>(what: &str, result: Result<T, RequestFailed>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(resource = what, error = %e, "export fetch failed");
            None
        }
    }
}

/// Write an export document as pretty JSON.
pub fn write_export(path: &Path, document: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    Ok(())
}
