//! Terminal UI for checking Reading bin collection days.

mod app;
mod input;
mod prefs;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use binday_core::controller::{ControllerConfig, ResolutionController};
use binday_core::ports::{AddressLookup, ScheduleSource};
use binday_core::store::SelectionStore;
use binday_provider_reading::ReadingClient;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::input::Action;
use crate::prefs::FilePreferences;

const DEFAULT_BASE_URL: &str = "http://116.203.83.250/api/reading";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    // HTTP + controller setup
    let client = Client::builder()
        .user_agent("binday/0.1")
        .timeout(StdDuration::from_secs(30))
        .build()?;

    let base_url =
        std::env::var("BINDAY_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
    let provider: Arc<ReadingClient> = Arc::new(ReadingClient::new(client, &base_url));
    let lookup: Arc<dyn AddressLookup> = provider.clone();
    let schedules: Arc<dyn ScheduleSource> = provider;

    let store = SelectionStore::new(Arc::new(FilePreferences::new(prefs::default_path()?)));

    let controller = ResolutionController::new(
        lookup,
        schedules,
        store,
        ControllerConfig::default(),
    );

    // A saved address skips straight to the schedule.
    controller.init().await;

    let app = App::new(controller);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Fold in whatever the controller published since the last tick
        app.refresh();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
            }
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    // The terminal runs in raw mode, so logs go to a file instead of
    // stderr.
    let dir = prefs::config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("binday.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("binday=info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("binday starting");
    Ok(())
}
