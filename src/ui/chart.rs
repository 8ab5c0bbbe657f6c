//! Yield chart rendering.
//!
//! Draws the temperature trend on a fixed Y axis, with the interlock limit
//! as a horizontal reference line.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::app::App;
use crate::data::ChartPoint;

const TITLE: &str = " Thermal Trend Analysis (Chamber A) ";

/// Render the yield chart into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chart = &app.yield_chart;
    let settings = &app.chart_settings;
    let theme = &app.theme;

    let values = chart.display_values(Instant::now());
    let trend: Vec<(f64, f64)> = values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect();

    let x_max = (values.len().saturating_sub(1) as f64).max(1.0);
    let limit_line = [(0.0, settings.safety_limit), (x_max, settings.safety_limit)];

    let datasets = vec![
        Dataset::default()
            .name("temp °C")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.trend))
            .data(&trend),
        Dataset::default()
            .name(format!("limit {}", settings.safety_limit))
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.critical))
            .data(&limit_line),
    ];

    let axis_style = Style::default().fg(theme.border);
    let x_axis = Axis::default()
        .style(axis_style)
        .bounds([0.0, x_max])
        .labels(time_labels(chart.points()));
    let y_axis = Axis::default()
        .style(axis_style)
        .bounds([settings.y_min, settings.y_max])
        .labels(value_labels(settings.y_min, settings.y_max));

    let block = Block::default()
        .title(Span::styled(
            TITLE,
            Style::default().fg(theme.trend).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    let widget = Chart::new(datasets).block(block).x_axis(x_axis).y_axis(y_axis);
    frame.render_widget(widget, area);
}

/// First, middle and last sample times; nothing when the chart is empty.
fn time_labels(points: &[ChartPoint]) -> Vec<Line<'static>> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![Line::from(points[0].time.clone())],
        n => vec![
            Line::from(points[0].time.clone()),
            Line::from(points[n / 2].time.clone()),
            Line::from(points[n - 1].time.clone()),
        ],
    }
}

fn value_labels(min: f64, max: f64) -> Vec<Line<'static>> {
    [min, (min + max) / 2.0, max]
        .iter()
        .map(|v| Line::from(format!("{:.0}", v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: &str) -> ChartPoint {
        ChartPoint {
            time: time.to_string(),
            temp: 180.0,
        }
    }

    #[test]
    fn test_time_labels() {
        assert!(time_labels(&[]).is_empty());
        assert_eq!(time_labels(&[point("10:00:00")]).len(), 1);

        let labels = time_labels(&[
            point("10:00:00"),
            point("10:00:05"),
            point("10:00:10"),
            point("10:00:15"),
        ]);
        let text: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["10:00:00", "10:00:10", "10:00:15"]);
    }

    #[test]
    fn test_value_labels() {
        let text: Vec<String> = value_labels(175.0, 195.0).iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["175", "185", "195"]);
    }
}
