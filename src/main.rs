use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;

use fabwatch::app::{self, App, View};
use fabwatch::{events, logging, ui, HttpTelemetryClient, Settings, TelemetryApi};

/// Minimum terminal size for usable display
const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 16;

/// First row of the quarantine table body: header, tabs, border, column titles.
const TABLE_BODY_ROW: u16 = 4;

#[derive(Parser, Debug)]
#[command(name = "fabwatch")]
#[command(about = "Live terminal dashboard for fab tool telemetry")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Telemetry API base URL (e.g. "http://localhost:8000/api/v1")
    #[arg(long)]
    api_url: Option<String>,

    /// Latest-snapshot poll interval (e.g., "2s", "500ms")
    #[arg(long)]
    latest_interval: Option<String>,

    /// History poll interval (e.g., "5s")
    #[arg(long)]
    history_interval: Option<String>,

    /// Log file (the terminal is used by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch everything once, export to JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    /// Load settings and apply command-line overrides.
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(ref url) = self.api_url {
            settings.api_base_url = url.clone();
        }
        if let Some(ref interval) = self.latest_interval {
            settings.latest_interval = interval.clone();
        }
        if let Some(ref interval) = self.history_interval {
            settings.history_interval = interval.clone();
        }
        if let Some(ref path) = self.log_file {
            settings.log_file = path.clone();
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = args.settings()?;

    logging::init(&settings.log_file)?;
    info!(api = %settings.api_base_url, "starting fabwatch");

    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let client: Arc<dyn TelemetryApi> = Arc::new(HttpTelemetryClient::new(&settings.api_base_url));

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&rt, client.as_ref(), &export_path);
    }

    // Pollers are spawned onto the runtime while the UI runs on this thread
    let _guard = rt.enter();
    let app = App::new(client, &settings)?;
    let result = run_tui(app);

    info!("fabwatch stopped");
    result
}

/// Run the TUI until the user quits.
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    // Stop polling before the terminal is handed back
    drop(app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.tick();

        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = Rect::new(0, top, area.width, 5.min(area.height - top));
                frame.render_widget(paragraph, centered);
                return;
            }

            let [header, tabs, content, status] = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .areas(area);

            ui::common::render_header(frame, app, header);
            ui::common::render_tabs(frame, app, tabs);

            match app.current_view {
                View::Dashboard => ui::dashboard::render(frame, app, content),
                View::Quarantine => ui::quarantine::render(frame, app, content),
            }

            ui::common::render_status_bar(frame, app, status);

            if app.show_reset_confirm {
                ui::common::render_confirm_reset(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events; shorter while the chart line is moving
        if let Some(event) = events::poll_event(app.poll_timeout(Instant::now()))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, TABLE_BODY_ROW),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Fetch every resource once and write it to a JSON file
fn export_to_file(
    rt: &tokio::runtime::Runtime,
    client: &dyn TelemetryApi,
    export_path: &Path,
) -> Result<()> {
    let document = rt.block_on(app::fetch_export(client));
    app::write_export(export_path, &document)?;

    info!(path = %export_path.display(), "exported dashboard state");
    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}
