//! Temperature trend chart state.
//!
//! The chart owns its own history poller: it fetches once on mount, then on
//! every period, and replaces its points wholesale with each successful
//! response. Dropping the chart stops the poller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::data::{chart_points, ChartPoint, HistoryResponse};
use crate::source::{Poller, RequestFailed, Schedule, TelemetryApi};

/// Mounted yield chart.
#[derive(Debug)]
pub struct YieldChart {
    poller: Poller<Vec<ChartPoint>>,
    points: Vec<ChartPoint>,
    /// Points shown before the last replacement, for the line transition.
    previous: Vec<ChartPoint>,
    changed_at: Option<Instant>,
    transition: Duration,
}

impl YieldChart {
    /// Mount the chart and start polling history.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(client: Arc<dyn TelemetryApi>, period: Duration, transition: Duration) -> Self {
        let poller = Poller::spawn(
            "history",
            Schedule::immediately_then_every(period),
            move || {
                let client = client.clone();
                async move {
                    let body = client.get_history().await?;
                    let response = HistoryResponse::from_value(body)?;
                    Ok::<_, RequestFailed>(chart_points(&response.history))
                }
            },
        );

        Self {
            poller,
            points: Vec::new(),
            previous: Vec::new(),
            changed_at: None,
            transition,
        }
    }

    /// Apply the newest history response, if one arrived.
    ///
    /// Returns true if the displayed points changed.
    pub fn update(&mut self) -> bool {
        match self.poller.poll() {
            Some(points) => {
                self.replace(points, Instant::now());
                true
            }
            None => false,
        }
    }

    fn replace(&mut self, points: Vec<ChartPoint>, now: Instant) {
        self.previous = std::mem::replace(&mut self.points, points);
        self.changed_at = Some(now);
    }

    /// Points of the last successful response.
    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    /// Fetch history now instead of waiting for the next tick.
    pub fn refresh_now(&self) {
        self.poller.refresh_now();
    }

    /// Whether the line transition is still running.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.progress(now) < 1.0
    }

    /// Temperatures to draw at `now`, mid-transition if one is running.
    pub fn display_values(&self, now: Instant) -> Vec<f64> {
        interpolate(&self.previous, &self.points, self.progress(now))
    }

    fn progress(&self, now: Instant) -> f64 {
        let Some(changed_at) = self.changed_at else {
            return 1.0;
        };
        if self.transition.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(changed_at);
        (elapsed.as_secs_f64() / self.transition.as_secs_f64()).min(1.0)
    }
}

/// Blend from the previous series to the current one.
///
/// `progress` runs from 0 (previous) to 1 (current). Points with no
/// counterpart in the previous series grow out of its last value.
pub fn interpolate(previous: &[ChartPoint], current: &[ChartPoint], progress: f64) -> Vec<f64> {
    let progress = progress.clamp(0.0, 1.0);
    current
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let from = previous.get(i).or(previous.last()).map(|p| p.temp).unwrap_or(point.temp);
            from + (point.temp - from) * progress
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{calls, failed, history_body, FakeApi};
    use serde_json::json;

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    fn temps(chart: &YieldChart) -> Vec<f64> {
        chart.points().iter().map(|p| p.temp).collect()
    }

    fn points(temps: &[f64]) -> Vec<ChartPoint> {
        temps
            .iter()
            .map(|&temp| ChartPoint {
                time: "00:00:00".to_string(),
                temp,
            })
            .collect()
    }

    #[test]
    fn test_interpolate_endpoints() {
        let previous = points(&[180.0, 182.0]);
        let current = points(&[184.0, 186.0]);

        assert_eq!(interpolate(&previous, &current, 0.0), vec![180.0, 182.0]);
        assert_eq!(interpolate(&previous, &current, 1.0), vec![184.0, 186.0]);
        assert_eq!(interpolate(&previous, &current, 0.5), vec![182.0, 184.0]);
    }

    #[test]
    fn test_interpolate_new_points_grow_from_last() {
        let previous = points(&[180.0]);
        let current = points(&[180.0, 190.0]);

        assert_eq!(interpolate(&previous, &current, 0.5), vec![180.0, 185.0]);
    }

    #[test]
    fn test_interpolate_from_empty() {
        let current = points(&[181.0, 183.0]);
        assert_eq!(interpolate(&[], &current, 0.0), vec![181.0, 183.0]);
    }

    #[test]
    fn test_interpolate_shrinking_series() {
        let previous = points(&[180.0, 181.0, 182.0]);
        let current = points(&[190.0]);
        assert_eq!(interpolate(&previous, &current, 1.0), vec![190.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_fetches_at_once_then_replaces_wholesale() {
        let api = Arc::new(
            FakeApi::new().with_history(vec![history_body(&[180.0, 181.0]), history_body(&[185.0])]),
        );
        let mut chart = YieldChart::mount(api.clone(), Duration::from_secs(5), Duration::ZERO);
        assert!(chart.points().is_empty());

        advance(1).await;
        assert!(chart.update());
        assert_eq!(calls(&api.history_calls), 1);
        assert_eq!(temps(&chart), vec![180.0, 181.0]);

        advance(5_000).await;
        assert!(chart.update());
        assert_eq!(calls(&api.history_calls), 2);
        assert_eq!(temps(&chart), vec![185.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_poll_keeps_points() {
        let api = Arc::new(FakeApi::new().with_history(vec![history_body(&[182.0]), failed()]));
        let mut chart = YieldChart::mount(api.clone(), Duration::from_secs(5), Duration::ZERO);

        advance(1).await;
        chart.update();
        let before = chart.points().to_vec();

        advance(5_000).await;
        assert!(!chart.update());
        assert_eq!(calls(&api.history_calls), 2);
        assert_eq!(chart.points(), before.as_slice());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_body_counts_as_failure() {
        let api = Arc::new(
            FakeApi::new().with_history(vec![history_body(&[182.0]), Ok(json!({ "detail": "oops" }))]),
        );
        let mut chart = YieldChart::mount(api.clone(), Duration::from_secs(5), Duration::ZERO);

        advance(1).await;
        chart.update();
        advance(5_000).await;
        assert!(!chart.update());
        assert_eq!(temps(&chart), vec![182.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_temperature_points_shown() {
        let api = Arc::new(FakeApi::new().with_history(vec![Ok(json!({
            "history": [
                { "metric": "temperature", "time": "2024-01-01T00:00:00Z", "value": 182 },
                { "metric": "pressure", "time": "2024-01-01T00:00:01Z", "value": 5 }
            ]
        }))]));
        let mut chart = YieldChart::mount(api.clone(), Duration::from_secs(5), Duration::ZERO);

        advance(1).await;
        chart.update();
        assert_eq!(chart.points().len(), 1);
        assert_eq!(chart.points()[0].temp, 182.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_null_pressure_sample_does_not_drop_response() {
        let api = Arc::new(FakeApi::new().with_history(vec![Ok(json!({
            "history": [
                { "metric": "temperature", "time": "2024-01-01T00:00:00Z", "value": 182 },
                { "metric": "pressure", "time": "2024-01-01T00:00:01Z", "value": null }
            ]
        }))]));
        let mut chart = YieldChart::mount(api.clone(), Duration::from_secs(5), Duration::ZERO);

        advance(1).await;
        assert!(chart.update());
        assert_eq!(temps(&chart), vec![182.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_stops_polling() {
        let api = Arc::new(FakeApi::new().with_history(vec![history_body(&[182.0])]));
        let chart = YieldChart::mount(api.clone(), Duration::from_secs(5), Duration::ZERO);

        advance(1).await;
        assert_eq!(calls(&api.history_calls), 1);

        drop(chart);
        advance(60_000).await;
        assert_eq!(calls(&api.history_calls), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_runs_from_previous_to_current() {
        let api = Arc::new(
            FakeApi::new().with_history(vec![history_body(&[180.0]), history_body(&[190.0])]),
        );
        let mut chart =
            YieldChart::mount(api.clone(), Duration::from_secs(5), Duration::from_millis(300));

        advance(1).await;
        chart.update();
        advance(5_000).await;
        chart.update();

        let changed_at = chart.changed_at.unwrap();
        assert!(chart.is_animating(changed_at));
        assert_eq!(chart.display_values(changed_at), vec![180.0]);
        let midway = chart.display_values(changed_at + Duration::from_millis(150));
        assert!((midway[0] - 185.0).abs() < 1e-6, "{:?}", midway);
        assert_eq!(chart.display_values(changed_at + Duration::from_millis(300)), vec![190.0]);
        assert!(!chart.is_animating(changed_at + Duration::from_millis(300)));
    }
}
