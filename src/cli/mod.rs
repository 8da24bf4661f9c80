mod shell;

pub use shell::*;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{BankConfig, BankService};
use crate::domain::{default_accounts, today_usage, CHART_LIMIT, CHART_MIN_MILLIS};
use crate::io::CsvUsageSource;

/// Pocketbank - demo bank ledger and screen-time report
#[derive(Parser)]
#[command(name = "pocketbank")]
#[command(about = "An in-memory demo bank with deposits, withdrawals and transfers")]
#[command(version)]
pub struct Cli {
    /// JSON config file (seed accounts, PIN, currency symbol, date format)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive banking session on stdin
    Shell,

    /// Run the reference scenario against fresh seed accounts
    Demo,

    /// Show per-app foreground time for one day
    Usage {
        /// CSV file of usage events (package,event,timestamp_ms)
        #[arg(short, long)]
        events: PathBuf,

        /// Day to report (YYYY-MM-DD, defaults to today up to now)
        #[arg(long)]
        date: Option<String>,

        /// Maximum number of apps in the top list
        #[arg(short, long, default_value_t = CHART_LIMIT)]
        top: usize,
    },
}

/// Install the tracing subscriber. `RUST_LOG` wins over the verbose flag.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose);
        let config = BankConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Shell => {
                let service = BankService::new(&config)?;
                let stdin = io::stdin();
                let mut stdout = io::stdout();
                Shell::new(service).run(stdin.lock(), &mut stdout)?;
            }

            Commands::Demo => {
                let mut stdout = io::stdout();
                run_demo(&config, &mut stdout)?;
            }

            Commands::Usage { events, date, top } => {
                let now = match date {
                    Some(date_str) => end_of_day(&date_str).with_context(|| {
                        format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                    })?,
                    None => Local::now(),
                };
                let mut stdout = io::stdout();
                run_usage_command(&CsvUsageSource::new(events), now, top, &mut stdout)?;
            }
        }

        Ok(())
    }
}

/// Deposit, withdraw and transfer against the default seed accounts,
/// printing each outcome. Configured accounts are ignored since the scenario
/// names Admin, User1 and User2; PIN, currency and date format still apply.
pub fn run_demo<W: Write>(config: &BankConfig, out: &mut W) -> Result<()> {
    let config = BankConfig {
        accounts: default_accounts(),
        ..config.clone()
    };

    let steps: Vec<(String, ShellCommand)> = vec![
        (
            "login Admin".into(),
            ShellCommand::Login {
                username: "Admin".into(),
                pin: config.pin.clone(),
            },
        ),
        ("deposit 500".into(), ShellCommand::Deposit { amount: "500".into() }),
        ("withdraw 0".into(), ShellCommand::Withdraw { amount: "0".into() }),
        (
            "transfer User2 1000".into(),
            ShellCommand::Transfer {
                to: "User2".into(),
                amount: "1000".into(),
            },
        ),
        ("balance".into(), ShellCommand::Balance),
        ("logout".into(), ShellCommand::Logout),
        (
            "login User1".into(),
            ShellCommand::Login {
                username: "User1".into(),
                pin: config.pin.clone(),
            },
        ),
        ("withdraw 6000".into(), ShellCommand::Withdraw { amount: "6000".into() }),
        (
            "transfer User1 5".into(),
            ShellCommand::Transfer {
                to: "User1".into(),
                amount: "5".into(),
            },
        ),
        ("balance".into(), ShellCommand::Balance),
    ];

    let mut shell = Shell::new(BankService::new(&config)?);
    for (label, command) in steps {
        writeln!(out, "> {}", label)?;
        shell.execute(command, out)?;
    }

    writeln!(out)?;
    writeln!(out, "{:<20} {:>12}", "ACCOUNT", "BALANCE")?;
    writeln!(out, "{}", "-".repeat(33))?;
    for account in shell.service().ledger().accounts() {
        writeln!(
            out,
            "{:<20} {:>12}",
            account.username,
            shell.service().format(account.balance)
        )?;
    }
    Ok(())
}

/// Print the usage list and the top apps for the day ending at `now`.
pub fn run_usage_command<W: Write>(
    source: &CsvUsageSource,
    now: DateTime<Local>,
    top: usize,
    out: &mut W,
) -> Result<()> {
    let report = today_usage(source, now)?;
    let ranked = report.ranked();

    writeln!(out, "App usage for {}", now.format("%Y-%m-%d"))?;
    if ranked.is_empty() {
        writeln!(out, "No usage recorded.")?;
        return Ok(());
    }

    let chart = report.chart_entries(top, CHART_MIN_MILLIS);
    if !chart.is_empty() {
        writeln!(out)?;
        writeln!(out, "Top apps (minutes):")?;
        for bar in &chart {
            writeln!(out, "  {}. {:<32} {:>8.1}", bar.index + 1, ranked[bar.index].package, bar.minutes)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{:<36} {:>20}", "APP", "TIME")?;
    writeln!(out, "{}", "-".repeat(57))?;
    for entry in &ranked {
        writeln!(out, "{:<36} {:>20}", entry.package, entry.bucket().to_string())?;
    }
    Ok(())
}

fn end_of_day(date_str: &str) -> Result<DateTime<Local>> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?;
    let last_ms = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).context("invalid time")?;
    match Local.from_local_datetime(&date.and_time(last_ms)) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(_, dt) => Ok(dt),
        LocalResult::None => anyhow::bail!("{} has no end of day in the local time zone", date_str),
    }
}
