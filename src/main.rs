use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::event::KeyEventKind;
use tracing::info;

use taskreap::app::{App, Task};
use taskreap::config::{self, Config, load_config, load_config_from_path};
use taskreap::event::{Event, EventHandler};
use taskreap::format::{format_cpu, format_mb, pad_unicode};
use taskreap::logging;
use taskreap::system::group::{SortKey, group_processes};
use taskreap::system::kill::TerminationExecutor;
use taskreap::system::process::Pid;
use taskreap::system::snapshot::SnapshotReader;
use taskreap::ui;

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(
    name = "taskreap",
    version,
    about = "List running processes grouped by name and terminate them"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial sort: name, memory, cpu
    #[arg(long)]
    sort: Option<SortKey>,

    /// List names and PIDs only, skipping memory and CPU
    #[arg(long, default_value_t = false)]
    basic: bool,

    /// Timeout for each external command, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write JSON tracing events to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the grouped process list and exit
    List {
        /// Emit JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Forcibly terminate one process by PID
    Kill { pid: Pid },
    /// Forcibly terminate every process with this exact name
    KillAll { name: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    match &cli.log_file {
        Some(path) => logging::init_file(path)?,
        // stderr would draw over the TUI, so it only logs when asked to.
        None if cli.command.is_some() => logging::init_stderr()?,
        None => {}
    }
    let config = load_config_for_cli(&cli);

    match cli.command {
        None => run_tui(config).await,
        Some(Command::List { json }) => list(&config, json).await,
        Some(Command::Kill { pid }) => {
            let executor = TerminationExecutor::new(config.general.command_timeout());
            executor.kill_by_pid(pid).await?;
            println!("Killed PID {pid}");
            Ok(())
        }
        Some(Command::KillAll { name }) => {
            let executor = TerminationExecutor::new(config.general.command_timeout());
            let outcome = executor.kill_all_by_name(&name).await?;
            if outcome.partial {
                println!(
                    "Killed {} of {} processes named {name}",
                    outcome.terminated, outcome.attempted
                );
            } else {
                println!("Killed all processes named {name}");
            }
            Ok(())
        }
    }
}

async fn run_tui(config: Config) -> Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, &config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: &Config) -> Result<()> {
    let mut app = App::new(config);
    let mut events = EventHandler::new(TICK_RATE);
    info!("taskreap started");

    perform(terminal, &mut app, Task::Refresh { announce: true }).await?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key, received) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key, received) {
                    Some(task) => perform(terminal, &mut app, task).await?,
                    None => {
                        terminal.draw(|frame| ui::draw(frame, &app))?;
                    }
                }
            }
            Event::Tick => {
                let had_notification = app.notification.is_some();
                app.on_tick();
                if had_notification && app.notification.is_none() {
                    terminal.draw(|frame| ui::draw(frame, &app))?;
                }
            }
            Event::Resize => {
                terminal.draw(|frame| ui::draw(frame, &app))?;
            }
        }
    }

    Ok(())
}

/// Runs a task and its follow-ups, drawing the in-progress state before
/// each await and the result after.
async fn perform(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    task: Task,
) -> Result<()> {
    let mut next = Some(task);
    while let Some(task) = next {
        app.begin_task(&task);
        terminal.draw(|frame| ui::draw(frame, app))?;
        next = app.run_task(task).await;
    }
    terminal.draw(|frame| ui::draw(frame, app))?;
    Ok(())
}

async fn list(config: &Config, json: bool) -> Result<()> {
    let reader = SnapshotReader::new(config.general.depth(), config.general.command_timeout());
    let records = reader.list_processes().await?;
    let groups = group_processes(&records, config.general.sort_key());

    if json {
        let out = serde_json::to_string_pretty(&groups).wrap_err("failed to encode process list")?;
        println!("{out}");
        return Ok(());
    }

    let name_width = groups
        .iter()
        .map(|g| unicode_width::UnicodeWidthStr::width(g.name()))
        .max()
        .unwrap_or(4)
        .clamp(4, 48);
    println!(
        "{}{:>10}{:>9}{:>12}",
        pad_unicode("NAME", name_width),
        "PIDS",
        "CPU",
        "MEMORY"
    );
    for group in &groups {
        let pids = match group.single_pid() {
            Some(pid) => pid.to_string(),
            None => format!("{}x", group.instance_count()),
        };
        println!(
            "{}{:>10}{:>9}{:>12}",
            pad_unicode(group.name(), name_width),
            pids,
            format_cpu(group.avg_cpu()),
            format_mb(group.total_memory_mb())
        );
    }
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(sort) = cli.sort {
        config.general.default_sort = sort.label().to_lowercase();
    }
    if cli.basic {
        config.general.enumeration = "basic".to_string();
    }
    if let Some(ms) = cli.timeout_ms {
        config.general.command_timeout_ms = ms;
    }
    tracing::debug!(path = ?config::config_path(), "configuration resolved");

    config
}
