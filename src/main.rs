use clap::Parser;
use eyre::{Result, WrapErr};
use std::{fs::File, path::PathBuf, sync::Mutex};
use todo_tui::{run_app, App, RandomGenerator, TodoStore, BULK_COUNT};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "todo-tui")]
#[command(about = "In-memory todo list in the terminal")]
#[command(version)]
struct Cli {
    /// Seed for generated ids and placeholder todos (default: random)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of todos created by the bulk action
    #[arg(long, default_value_t = BULK_COUNT)]
    bulk_count: usize,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level used with --log-file
    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn init_logging(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(cli.log_level)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let generator = match cli.seed {
        Some(seed) => RandomGenerator::seeded(seed),
        None => RandomGenerator::new(),
    };
    let mut app = App::new(TodoStore::with_generator(generator)).with_bulk_count(cli.bulk_count);
    info!(seed = ?cli.seed, bulk_count = cli.bulk_count, "Starting todo-tui");

    // Terminal setup; also installs a panic hook that restores the terminal
    let mut terminal = match ratatui::try_init() {
        Ok(terminal) => terminal,
        Err(err) => {
            // setup can fail after raw mode is already on
            ratatui::restore();
            return Err(err).wrap_err("Failed to initialize terminal");
        }
    };

    let result = run_app(&mut terminal, &mut app);

    // Best-effort restore so the event loop error is the one reported
    ratatui::restore();

    result.wrap_err("Event loop failed")
}
