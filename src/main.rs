use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use restrict_imports::config::{self, ConfigError};
use restrict_imports::lint::Linter;
use restrict_imports::report::{write_report, ReportFormat};
use restrict_imports::restriction::RestrictionTable;

#[derive(Parser)]
#[command(name = "restrict-imports")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Flags restricted JavaScript/TypeScript imports and rewrites them to their replacements", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a file or project for restricted imports
    Check {
        /// File or directory to check (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// JSON file with the restriction list
        #[arg(short, long)]
        config: PathBuf,

        /// Rewrite fixable imports in place
        #[arg(long)]
        fix: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<ConfigError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Check {
            path,
            config: config_path,
            fix,
            format,
        }) => {
            let entries = config::parse_file(&config_path).with_context(|| {
                format!("Failed to load config from {}", config_path.display())
            })?;
            let table = RestrictionTable::build(&entries)
                .with_context(|| format!("Invalid restriction in {}", config_path.display()))?;
            debug!("Loaded {} restriction(s)", table.len());

            let mut linter = Linter::new(table)?;
            let report = linter.lint_path(&path, fix);

            let stdout = io::stdout();
            write_report(format, &report, &mut stdout.lock())
                .context("Failed to write report")?;

            if report.has_violations() {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Some(Commands::Version) => {
            println!("restrict-imports v{}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("restrict-imports - Restricted import checker");
            println!("Run 'restrict-imports check --config <FILE>' to check the current directory");
            println!("Run 'restrict-imports --help' for more information");
            Ok(ExitCode::SUCCESS)
        }
    }
}
