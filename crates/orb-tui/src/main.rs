mod app;
mod command;
mod effects;
mod theme;
mod ui;
mod views;
mod widgets;

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use chrono::Local;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::time::MissedTickBehavior;

use orb_core::config::Config;
use orb_core::feed::LiveFeed;
use orb_core::seed;
use orb_core::store::ProjectStore;

use crate::app::App;

const SERVICE: &str = "budget-orb";

/// Terminal budget dashboard: features on a spinning orb, a burndown drawer
/// behind the sun.
#[derive(Parser)]
#[command(name = "budget-orb", version, about)]
struct Cli {
    /// Config file (defaults to ~/.budget-orb/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project seed document to load instead of the bundled sample.
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Fixed seed for the burndown noise and the live feed.
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Disable simulated live updates.
    #[arg(long)]
    no_feed: bool,

    /// Read commands from stdin and write JSON to stdout instead of drawing.
    #[arg(long)]
    headless: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading config")?;

    if cli.headless {
        // stdout carries the protocol, so logs go to stderr.
        if cli.log_json {
            orb_telemetry::logging::init_logging_json(SERVICE, &config.general.log_level);
        } else {
            orb_telemetry::logging::init_logging(SERVICE, &config.general.log_level);
        }
    } else if let Err(e) = orb_telemetry::logging::init_logging_to_file(
        SERVICE,
        &config.general.log_level,
        &Config::log_path(),
        cli.log_json,
    ) {
        eprintln!("warning: file logging disabled: {e}");
    }

    let app = build_app(&cli, config)?;

    if cli.headless {
        return run_headless(app.without_effects());
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("starting runtime")?;
    let result = runtime.block_on(run(app));

    restore_terminal()?;
    result
}

fn build_app(cli: &Cli, config: Config) -> Result<App> {
    let seed_path = cli
        .seed_file
        .clone()
        .or_else(|| config.general.seed_path.as_ref().map(PathBuf::from));
    let mut project = match seed_path {
        Some(path) => seed::load_from(&path)
            .with_context(|| format!("loading seed {}", path.display()))?,
        None => seed::bundled().context("parsing bundled seed")?,
    };
    config.apply_overrides(&mut project);

    let store = ProjectStore::new(project, config.budget.rules());
    let burndown_seed = cli
        .rng_seed
        .or(config.burndown.rng_seed)
        .unwrap_or_else(rand::random);

    let feed = if cli.no_feed || !config.feed.enabled {
        None
    } else {
        let max = config.feed.max_increment_hours;
        Some(match cli.rng_seed.or(config.feed.rng_seed) {
            Some(seed) => LiveFeed::seeded(seed, max),
            None => LiveFeed::new(max),
        })
    };

    let app = App::new(store, config, Local::now().date_naive(), burndown_seed);
    Ok(match feed {
        Some(feed) => app.with_feed(feed),
        None => app,
    })
}

/// Interactive loop: animation frames, feed ticks and terminal input on one
/// current-thread runtime.
async fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let frame_period = Duration::from_secs_f64(1.0 / f64::from(app.config.display.frame_rate));
    let mut frames = tokio::time::interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut feed = tokio::time::interval(Duration::from_secs(app.config.feed.interval_secs));
    feed.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it so the feed starts one
    // period in.
    feed.tick().await;

    let mut input = EventStream::new();
    let mut last_frame = Instant::now();

    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = Instant::now();
                app.on_frame(now.duration_since(last_frame));
                last_frame = now;
                terminal.draw(|frame| ui::render(frame, &mut app))?;
            }
            _ = feed.tick() => app.on_feed_tick(),
            event = input.next() => match event {
                Some(Ok(Event::Key(key))) => app.on_key(key),
                Some(Ok(Event::Mouse(mouse))) => app.on_mouse(mouse),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("reading terminal input"),
                None => break,
            },
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("dashboard closed");
    Ok(())
}

/// Headless mode: one command per stdin line (JSON or `:` text), JSON lines
/// on stdout. Store events are forwarded as they happen.
///
/// Usage: `echo '{"cmd":"query_state"}' | budget-orb --headless`
fn run_headless(mut app: App) -> Result<()> {
    let events = app.store.subscribe();

    emit_event(&serde_json::json!({
        "event": "started",
        "project": app.store.project().name,
        "features": app.store.features().len(),
        "feed": format!("{:?}", app.feed_state()).to_lowercase(),
    }));

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match command::parse_json_command(line).or_else(|| command::parse_command(line)) {
            Some(cmd) => {
                let result = command::execute_command(&mut app, cmd);

                for event in events.try_iter() {
                    if let Ok(value) = serde_json::to_value(&event) {
                        emit_event(&value);
                    }
                }

                match result {
                    Some(json) => {
                        println!("{}", json);
                        let _ = io::stdout().flush();
                    }
                    None => emit_event(&serde_json::json!({"event": "ok"})),
                }
            }
            None => emit_event(&serde_json::json!({
                "event": "error",
                "message": format!("unknown command: {}", line),
            })),
        }

        if app.should_quit {
            emit_event(&serde_json::json!({"event": "quit"}));
            break;
        }
    }

    Ok(())
}

fn emit_event(value: &serde_json::Value) {
    if let Ok(s) = serde_json::to_string(value) {
        println!("{}", s);
        let _ = io::stdout().flush();
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
