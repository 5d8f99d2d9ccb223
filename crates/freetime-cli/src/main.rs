//! `freetime` CLI — resolve free time, rank tasks, and check scheduling
//! proposals from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Free time for the next 7 days from busy events on stdin
//! cat events.json | freetime resolve --events -
//!
//! # Custom work hours and buffers, fixed "now", plain-text output
//! freetime resolve -c freetime.toml -e events.json --now 2026-03-16T10:03:00 --format text
//!
//! # Rank tasks by priority label
//! freetime rank -t tasks.json
//!
//! # Render the scheduling assistant's input
//! freetime prompt -c freetime.toml -e events.json -t tasks.json
//!
//! # Check an assistant's answer against free time
//! freetime check -c freetime.toml -e events.json -p proposals.json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see each resolution step.

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use freetime_engine::clock::parse_local_datetime;
use freetime_engine::prompt::{build_prompt, render_free_time};
use freetime_engine::proposal::{check_proposals, Conflict};
use freetime_engine::{
    find_conflicts, normalize_events, parse_scheduled_items, rank, resolve, Config, FreeTime,
    RawBusyEvent, ScheduledItem, TaskCandidate,
};
use serde::Serialize;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "freetime",
    version,
    about = "Resolve free time from work hours and busy calendar events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every subcommand that resolves free time.
#[derive(Args)]
struct ResolveArgs {
    /// TOML configuration file (defaults apply if omitted)
    #[arg(short, long)]
    config: Option<String>,
    /// Busy events JSON file, or `-` for stdin (no busy events if omitted)
    #[arg(short, long)]
    events: Option<String>,
    /// Number of days to resolve, starting today
    #[arg(long, default_value_t = 7)]
    days: u32,
    /// Local wall-clock "now" (defaults to the current time in the configured zone)
    #[arg(long)]
    now: Option<String>,
    /// Do not cut today's hours at "now"
    #[arg(long)]
    no_truncate: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve free time slots per day
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Rank tasks by priority label
    Rank {
        /// Tasks JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        tasks: Option<String>,
    },
    /// Render the scheduling assistant's input text
    Prompt {
        #[command(flatten)]
        args: ResolveArgs,
        /// Tasks JSON file, or `-` for stdin
        #[arg(short, long)]
        tasks: String,
    },
    /// Check proposed placements against free time and each other
    Check {
        #[command(flatten)]
        args: ResolveArgs,
        /// Assistant output JSON file, or `-` for stdin
        #[arg(short, long)]
        proposals: String,
    },
}

/// Result of `freetime check`.
#[derive(Serialize)]
struct CheckReport<'a> {
    outside_free_time: Vec<&'a ScheduledItem>,
    conflicts: Vec<Conflict>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            args,
            format,
            output,
        } => {
            let (_, free) = resolve_free_time(&args)?;
            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&free)? + "\n",
                Format::Text => render_free_time(&free),
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Rank { tasks } => {
            let ranked = rank(read_tasks(tasks.as_deref())?);
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Commands::Prompt { args, tasks } => {
            let (config, free) = resolve_free_time(&args)?;
            let ranked = rank(read_tasks(Some(&tasks))?);
            print!("{}", build_prompt(&ranked, &free, &options_for(&config, &args)));
        }
        Commands::Check { args, proposals } => {
            let (config, free) = resolve_free_time(&args)?;
            let json = read_input(Some(&proposals))?;
            let items = parse_scheduled_items(&json, config.timezone()?)
                .context("Failed to parse proposals")?;
            let report = CheckReport {
                outside_free_time: check_proposals(&items, &free),
                conflicts: find_conflicts(&items),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides
/// the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("Failed to load config: {}", path))
        }
        None => Ok(Config::default()),
    }
}

fn options_for(config: &Config, args: &ResolveArgs) -> freetime_engine::ResolveOptions {
    let mut options = config.resolve_options();
    if args.no_truncate {
        options.truncate_to_now = false;
    }
    options
}

fn resolve_free_time(args: &ResolveArgs) -> Result<(Config, FreeTime)> {
    let config = load_config(args.config.as_deref())?;
    let tz = config.timezone()?;
    let template = config.template().context("Invalid work hours")?;
    let now = current_time(args.now.as_deref(), tz)?;

    let raw = match args.events.as_deref() {
        Some(path) => read_events(path)?,
        None => Vec::new(),
    };
    let busy = normalize_events(&raw, tz).context("Invalid busy events")?;
    debug!(events = busy.len(), %now, days = args.days, "resolving");

    let free = resolve(args.days, &template, &busy, now, &options_for(&config, args))?;
    Ok((config, free))
}

fn current_time(raw: Option<&str>, tz: Tz) -> Result<NaiveDateTime> {
    match raw {
        Some(raw) => parse_local_datetime(raw, tz)
            .with_context(|| format!("Invalid --now value: '{}'", raw)),
        None => Ok(Utc::now().with_timezone(&tz).naive_local()),
    }
}

fn read_events(path: &str) -> Result<Vec<RawBusyEvent>> {
    let json = read_input(Some(path))?;
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&json).context("Failed to parse busy events JSON")
}

fn read_tasks(path: Option<&str>) -> Result<Vec<TaskCandidate>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse tasks JSON")
}

/// Read a file, or stdin when `path` is omitted or `-`.
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
