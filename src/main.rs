mod app;
mod domain;
mod input;
mod logging;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persistence::{
    config_file, ensure_data_dir, init_local_data_dir, load_board, load_config_or_default, report_file,
    save_config, Config, FileStorage,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quadrant")]
#[command(about = "An Eisenhower-matrix task manager with deadlines and focus timers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .quadrant directory in the current directory
    Init,
    /// Write a markdown report of tracked focus time
    Stats {
        /// Report as of this date (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data dir>/stats-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_data_dir()?;
            save_config(config_file(&data_dir), &Config::default())?;
            println!("Initialized quadrant directory: {}", data_dir.display());
            println!();
            println!("Quadrant will now use this local directory for its data.");
            println!("Run 'quadrant' to open the matrix.");
            Ok(())
        }
        Some(Commands::Stats { date, output }) => run_stats(date, output),
        None => run_tui(),
    }
}

/// The instant a report describes: now for today, end of day for a past date
fn report_instant(date: Option<&str>) -> Result<DateTime<Local>> {
    let now = Local::now();
    let Some(date_str) = date else {
        return Ok(now);
    };

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?;
    if date >= now.date_naive() {
        return Ok(now);
    }

    let end_of_day = date.and_hms_opt(23, 59, 59).context("Invalid time of day")?;
    Local
        .from_local_datetime(&end_of_day)
        .earliest()
        .context("Date does not exist in the local timezone")
}

fn run_stats(date: Option<String>, output: Option<String>) -> Result<()> {
    let data_dir = ensure_data_dir()?;
    let config = load_config_or_default(config_file(&data_dir));
    logging::init_stderr_logging(&config.log_level);

    let at = report_instant(date.as_deref())?;
    let board = load_board(&FileStorage::new(&data_dir), at.timestamp_millis());

    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| report_file(&data_dir, at.date_naive()));

    println!("Generating stats for {}...", at.date_naive());
    let report_path = report::generate_report(&board, at, &output_path)?;
    println!("Report generated: {}", report_path.display());
    Ok(())
}

fn run_tui() -> Result<()> {
    let data_dir = ensure_data_dir()?;
    let config = load_config_or_default(config_file(&data_dir));
    logging::init_file_logging(&data_dir, &config.log_level)?;
    log::info!("Using data directory: {}", data_dir.display());

    let storage = FileStorage::new(&data_dir);
    let board = load_board(&storage, domain::now_ms());
    let mut app = AppState::new(board, Box::new(storage), config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Open sessions stay open across restarts; only flush pending edits
    if app.needs_save {
        app.save();
    }

    if let Err(err) = result {
        log::error!("{:#}", err);
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration(app.config.tick_ms);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.tick();

        if app.needs_save {
            app.save();
        }
    }
}
