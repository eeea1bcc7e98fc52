//! Main CLI application structure

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{analog, sequence};
use crate::domain::{StampKind, TimestampGenerator};
use crate::storage::{Config, CounterManager};
use crate::vault;

#[derive(Parser)]
#[command(name = "stamp")]
#[command(author, version, about = "Generate note filenames based on date/time")]
#[command(
    long_about = "Generate note filenames following a date/time naming convention.

Note types:
  daily       YYYY-MM-DD
  fleeting    YYYY-MM-DD-FHHMMSS
  voice       YYYY-MM-DD-VTHHMMSS
  analog      YYYY-MM-DD-AN (sequential per day)
  monthly     YYYY-MM
  yearly      YYYY
  project     PXXXX (shorthand for seq --prefix P --width 4)
  seq         custom prefix + zero-padded number (workspace scan)

Without a type: YYYY-MM-DD-HHMM"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Add .md extension to output
    #[arg(long, global = true)]
    pub ext: bool,

    /// Copy to clipboard (macOS only)
    #[arg(long, global = true)]
    pub copy: bool,

    /// Quiet mode (no additional output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file (defaults to ~/.stamp/config.toml)
    #[arg(long, global = true, env = "STAMP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Counter file (overrides the config file setting)
    #[arg(long, global = true, env = "STAMP_COUNTER_FILE")]
    pub counter_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate daily note filename (YYYY-MM-DD)
    Daily,

    /// Generate fleeting note filename (YYYY-MM-DD-FHHMMSS)
    Fleeting,

    /// Generate voice transcript filename (YYYY-MM-DD-VTHHMMSS)
    Voice,

    /// Generate analog/slipbox note filename (YYYY-MM-DD-AN)
    Analog(analog::AnalogArgs),

    /// Generate monthly review filename (YYYY-MM)
    Monthly,

    /// Generate yearly review filename (YYYY)
    Yearly,

    /// Generate project number (PXXXX)
    #[command(long_about = "Equivalent to `stamp seq --prefix P --width 4`.")]
    Project(sequence::ProjectArgs),

    /// Generate sequential codes from the current directory
    #[command(alias = "sequential")]
    Seq(sequence::SeqArgs),

    /// Print version information
    Version,
}

/// Everything a command needs, built once per invocation
pub struct Runtime {
    pub config: Config,
    pub timestamps: TimestampGenerator,
    pub output: Output,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());
    let timestamps = timestamp_generator(&config)?;
    let output = Output::new(cli.format, cli.quiet)
        .with_result_options(cli.ext || config.always_extension, cli.copy);
    let counter_file = cli
        .counter_file
        .clone()
        .unwrap_or_else(|| config.counter_file.clone());

    let runtime = Runtime {
        config,
        timestamps,
        output,
    };

    let kind = match cli.command {
        None => StampKind::Default,
        Some(Commands::Daily) => StampKind::Daily,
        Some(Commands::Fleeting) => StampKind::Fleeting,
        Some(Commands::Voice) => StampKind::Voice,
        Some(Commands::Monthly) => StampKind::Monthly,
        Some(Commands::Yearly) => StampKind::Yearly,

        Some(Commands::Analog(args)) => {
            let counters = CounterManager::open(&counter_file)?;
            return analog::run(args, &runtime, &counters);
        }
        Some(Commands::Project(args)) => return sequence::run_project(args, &runtime),
        Some(Commands::Seq(args)) => return sequence::run_seq(args, &runtime),
        Some(Commands::Version) => {
            print_version(&runtime.output);
            return Ok(());
        }
    };

    let stamp = runtime.timestamps.stamp(kind);
    runtime.output.result(&stamp, None)
}

/// Logs go to stderr. `--verbose` enables debug output for stamp itself;
/// `RUST_LOG` takes precedence when set.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "warn,stamp=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

/// Loads configuration; any failure falls back to defaults with a warning
fn load_config(explicit: Option<&Path>) -> Config {
    let loaded = match explicit {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    loaded.unwrap_or_else(|e| {
        tracing::warn!("Using default configuration: {:#}", e);
        Config::default()
    })
}

/// Builds the timestamp generator, borrowing layouts from an enclosing
/// Obsidian vault when there is one
fn timestamp_generator(config: &Config) -> Result<TimestampGenerator> {
    let mut timestamps = TimestampGenerator::new(&config.timezone)?;

    let Ok(cwd) = std::env::current_dir() else {
        return Ok(timestamps);
    };

    match vault::detect(&cwd) {
        Ok(Some(found)) => {
            for problem in &found.problems {
                tracing::warn!("Obsidian detection warning: {}", problem);
            }
            if !timestamps.apply_layouts(found.layouts) {
                tracing::warn!(vault = %found.root.display(), "Ignoring unusable Obsidian date format");
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Obsidian detection warning: {:#}", e),
    }

    Ok(timestamps)
}

fn print_version(output: &Output) {
    let version = env!("CARGO_PKG_VERSION");
    if output.is_json() {
        output.data(&serde_json::json!({ "name": "stamp", "version": version }));
    } else {
        println!("stamp version {}", version);
    }
}
