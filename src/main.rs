use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::time::{Duration, Instant};
use std::{error::Error, io};

mod app;
mod clock;
mod config;
mod error;
mod indicator;
mod input;
mod layout;
mod logging;
mod models;
mod navigation;
mod runtime;
mod storage;
mod ui;

use app::App;
use chrono::Local;
use config::Config;
use runtime::Ticker;
use storage::ScheduleSource;

const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> Result<(), Box<dyn Error>> {
    let mut config = Config::load();
    if let Some(location) = std::env::args().nth(1) {
        config.source.location = location;
    }
    if let Err(err) = logging::init_tracing(&config.logging) {
        eprintln!("{err}");
    }

    let source = ScheduleSource::parse(&config.source.location);
    let mut app = App::new(config, source, Local::now().naive_local());
    app.begin_load();

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("terminal loop failed: {err}");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut ticker = Ticker::start(
        Duration::from_millis(app.config.ui.tick_millis),
        Instant::now(),
    );

    let result = loop {
        runtime::handle_load_completion(app);
        if ticker.fire(Instant::now()) {
            runtime::tick(app, Local::now().naive_local());
        }

        if let Err(err) = terminal.draw(|f| ui::ui(f, app)) {
            break Err(err);
        }

        let timeout = ticker
            .time_until_due(Instant::now())
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(event) => input::handle_event(app, event),
                Err(err) => break Err(err),
            },
            Ok(false) => {}
            Err(err) => break Err(err),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ticker.cancel();
    result
}
