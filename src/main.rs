use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

use reefwatch::app::{App, View};
use reefwatch::events;
use reefwatch::probe::{probe, Credentials, ProbeOutcome, ProbeScheduler};
use reefwatch::registry::Registry;
use reefwatch::status::StatusStore;
use reefwatch::ui;

#[derive(Parser, Debug)]
#[command(name = "reefwatch")]
#[command(about = "Ambient uptime aquarium - every endpoint is a fish")]
struct Args {
    /// Path to the endpoints registry file
    #[arg(short, long, default_value = "endpoints.json")]
    file: PathBuf,

    /// Register an endpoint URL before starting (repeatable)
    #[arg(long)]
    add: Vec<String>,

    /// Probe all endpoints once, print a table, and exit.
    /// Exits non-zero if any endpoint is down.
    #[arg(long)]
    check: bool,

    /// Write tracing output to this file (the terminal belongs to the TUI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let mut registry = Registry::load(&args.file)?;
    for url in &args.add {
        registry.add(url.clone(), None, None, Credentials::None);
    }
    if !args.add.is_empty() {
        registry.save()?;
    }

    let store = Arc::new(StatusStore::new());
    for endpoint in registry.iter() {
        store.register(&endpoint.id);
    }

    // The TUI owns the main thread; all probing runs on this runtime.
    let rt = tokio::runtime::Runtime::new()?;

    let client = reqwest::Client::builder()
        .user_agent(concat!("reefwatch/", env!("CARGO_PKG_VERSION")))
        .build()?;

    if args.check {
        return run_check(&rt, &registry, &client);
    }

    let scheduler = {
        let _guard = rt.enter();
        ProbeScheduler::spawn(Arc::clone(&store), client, registry.watch_targets())
    };

    let app = App::new(registry, store).with_scheduler(scheduler);
    run_tui(app)
}

/// Set up tracing to a file, if requested. Stderr is unusable once the
/// alternate screen is up.
fn init_tracing(log_file: Option<&std::path::Path>) -> Result<()> {
    if let Some(path) = log_file {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

/// One-shot headless mode: probe everything concurrently, print the results.
fn run_check(rt: &tokio::runtime::Runtime, registry: &Registry, client: &reqwest::Client) -> Result<()> {
    if registry.is_empty() {
        println!("No endpoints registered.");
        return Ok(());
    }

    let results = rt.block_on(async {
        let mut set = tokio::task::JoinSet::new();
        for endpoint in registry.iter() {
            let client = client.clone();
            let url = endpoint.url.clone();
            let credentials = endpoint.credentials.clone();
            set.spawn(async move {
                let outcome = probe(&client, &url, &credentials).await;
                (url, outcome)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = set.join_next().await {
            if let Ok(result) = joined {
                results.push(result);
            }
        }
        results
    });

    let mut failures = 0;
    for (url, outcome) in &results {
        match outcome {
            ProbeOutcome::Reachable => println!("OK    {url}"),
            ProbeOutcome::Unreachable(reason) => {
                failures += 1;
                println!("DOWN  {url} - {reason}");
            }
        }
    }

    if failures > 0 {
        println!("{failures} of {} endpoints down", results.len());
        std::process::exit(1);
    }
    Ok(())
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
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    app.shutdown();

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
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Advance the animation; reads the latest status snapshot without
        // waiting on any probe.
        app.frame();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                frame.render_widget(paragraph, area);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Failure banner
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Tank => ui::tank::render(frame, app, chunks[2]),
                View::Endpoints => ui::endpoints::render(frame, app, chunks[2]),
            }

            ui::common::render_error_banner(frame, app, chunks[3]);
            ui::common::render_status_bar(frame, app, chunks[4]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll briefly so the animation keeps running at ~30 fps.
        if let Some(event) = events::poll_event(Duration::from_millis(33))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
