//! # Bizdesk CLI
//!
//! Operator command line over bizdesk-core.
//!
//! ## Usage
//! ```text
//! bizdesk validate client client.json        normalized record, or violations (exit 2)
//! bizdesk validate project --partial -       partial update from stdin
//! bizdesk totals --tax-rate 10 invoice.json  recomputed invoice with totals
//! bizdesk number --prefix ACME               fresh invoice number
//! bizdesk overdue 2024-01-31 SENT            true / false
//! bizdesk overdue 2024-01-31 SENT --at 2024-01-15
//! bizdesk totals --at 2024-03-01 invoice.json
//! ```
//!
//! Results go to stdout as JSON; logs go to stderr.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bizdesk_core::validation::Mode;
use bizdesk_core::{EntityKind, SystemClock};

use crate::commands::{Report, TotalsOptions};
use crate::config::BizdeskConfig;

#[derive(Parser, Debug)]
#[command(name = "bizdesk", author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: bizdesk.toml in the platform config directory)
    #[arg(long, global = true, env = "BIZDESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate one record and print its normalized form
    Validate {
        /// client, invoice, invoice-item, payment, contract, project, task
        entity: EntityKind,

        /// Partial update: only present fields are checked, no defaults
        #[arg(long)]
        partial: bool,

        /// JSON file, or `-` for stdin
        input: Option<PathBuf>,
    },

    /// Validate an invoice and recompute its totals
    Totals {
        /// Tax rate in percent (overrides the invoice's tax amount)
        #[arg(long)]
        tax_rate: Option<f64>,

        /// Discount amount (capped at the subtotal)
        #[arg(long)]
        discount: Option<f64>,

        /// Evaluate the effective status as of this instant instead of now
        #[arg(long, value_name = "DATE")]
        at: Option<String>,

        /// JSON file, or `-` for stdin
        input: Option<PathBuf>,
    },

    /// Print a new invoice number
    Number {
        /// Prefix (default from config)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print whether an invoice is overdue
    Overdue {
        /// Due date, e.g. 2024-01-31 or 2024-01-31T17:00:00Z
        due_date: String,

        /// DRAFT, SENT, PAID, OVERDUE or CANCELLED
        status: String,

        /// Evaluate as of this instant instead of now
        #[arg(long, value_name = "DATE")]
        at: Option<String>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // The global subscriber needs the configured level, so config loading
    // logs through a scoped one.
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || {
        BizdeskConfig::load(cli.config.as_deref())
    })
    .context("Failed to load configuration")?;
    init_tracing(&config.logging.level);
    debug!(?config, "Configuration loaded");

    let report = match cli.command {
        Command::Validate {
            entity,
            partial,
            input,
        } => {
            let mode = if partial { Mode::Partial } else { Mode::Create };
            let text = commands::read_input(input.as_deref())?;
            commands::validate_record(entity, mode, &text)?
        }
        Command::Totals {
            tax_rate,
            discount,
            at,
            input,
        } => {
            let clock = commands::clock_at(at.as_deref())?;
            let text = commands::read_input(input.as_deref())?;
            let options = TotalsOptions {
                tax_rate,
                discount,
                default_tax_rate: config.invoice.default_tax_rate,
            };
            commands::invoice_totals(&text, options, clock.as_ref())?
        }
        Command::Number { prefix } => {
            let prefix = prefix.unwrap_or(config.invoice.prefix);
            let number = commands::invoice_number(&prefix, &SystemClock, &mut rand::thread_rng());
            info!(%number, "Generated invoice number");
            println!("{}", number);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Overdue {
            due_date,
            status,
            at,
        } => {
            let clock = commands::clock_at(at.as_deref())?;
            let overdue = commands::overdue(&due_date, &status, clock.as_ref())?;
            println!("{}", overdue);
            return Ok(ExitCode::SUCCESS);
        }
    };

    print_report(&report)
}

fn print_report(report: &Report) -> Result<ExitCode> {
    let rendered = serde_json::to_string_pretty(&report.to_json())?;
    println!("{}", rendered);
    if let Report::Rejected(violations) = report {
        info!(violations = violations.len(), "Record rejected");
    }
    Ok(ExitCode::from(report.exit_code() as u8))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=bizdesk_core=trace` - Show trace for the core only
/// - Default: the configured `[logging] level`
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` when set, otherwise `fallback`, otherwise `info`.
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
