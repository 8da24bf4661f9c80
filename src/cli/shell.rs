use std::fs::File;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::application::{AppError, BankService};
use crate::io::Exporter;

const HELP: &str = "\
Commands:
  login <username> <pin>     Log in to an account
  logout                     Log out
  balance                    Show the dashboard of the logged-in account
  deposit <amount>           Deposit money
  withdraw <amount>          Withdraw money
  transfer <user> <amount>   Transfer money to another account
  history                    Show transaction history
  export <csv|json> [file]   Export transaction history
  export balances [file]     Export every account's balance as CSV
  accounts                   List account holders
  help                       Show this help
  quit                       Leave the shell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    HistoryCsv,
    HistoryJson,
    BalancesCsv,
}

/// One line typed into the banking shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Login { username: String, pin: String },
    Logout,
    Balance,
    Deposit { amount: String },
    Withdraw { amount: String },
    Transfer { to: String, amount: String },
    History,
    Export { target: ExportTarget, output: Option<String> },
    Accounts,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl ShellCommand {
    /// Parse a line. Blank lines parse to `None`.
    ///
    /// A missing amount is passed through as an empty string so the ledger
    /// reports it like any other invalid amount.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseCommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let arg = |w: Option<&str>| w.unwrap_or("").to_string();

        let command = match name.to_lowercase().as_str() {
            "login" => match (words.next(), words.next()) {
                (Some(username), pin) => ShellCommand::Login {
                    username: username.to_string(),
                    pin: arg(pin),
                },
                (None, _) => return Err(ParseCommandError::Usage("login <username> <pin>")),
            },
            "logout" => ShellCommand::Logout,
            "balance" | "dashboard" => ShellCommand::Balance,
            "deposit" => ShellCommand::Deposit {
                amount: arg(words.next()),
            },
            "withdraw" => ShellCommand::Withdraw {
                amount: arg(words.next()),
            },
            "transfer" => match words.next() {
                Some(to) => ShellCommand::Transfer {
                    to: to.to_string(),
                    amount: arg(words.next()),
                },
                None => return Err(ParseCommandError::Usage("transfer <user> <amount>")),
            },
            "history" => ShellCommand::History,
            "export" => {
                let target = match words.next().map(str::to_lowercase).as_deref() {
                    Some("csv") => ExportTarget::HistoryCsv,
                    Some("json") => ExportTarget::HistoryJson,
                    Some("balances") => ExportTarget::BalancesCsv,
                    _ => return Err(ParseCommandError::Usage("export <csv|json|balances> [file]")),
                };
                ShellCommand::Export {
                    target,
                    output: words.next().map(str::to_string),
                }
            }
            "accounts" => ShellCommand::Accounts,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => return Err(ParseCommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Whether the shell keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive front-end over a `BankService`.
pub struct Shell {
    service: BankService,
}

impl Shell {
    pub fn new(service: BankService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &BankService {
        &self.service
    }

    /// Read commands until end of input or `quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "Welcome to Bank App. Type 'help' for commands.")?;
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            match ShellCommand::parse(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => {
                    if self.execute(command, out)? == Flow::Quit {
                        break;
                    }
                }
                Err(e) => writeln!(out, "{}", e)?,
            }
        }
        Ok(())
    }

    /// Execute one command. Mistakes in what the user typed, including an
    /// export path that cannot be written, are printed and the shell goes
    /// on; anything else is returned as an error.
    pub fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<Flow> {
        let is_export = matches!(command, ShellCommand::Export { .. });
        let err = match self.dispatch(command, out) {
            Ok(flow) => return Ok(flow),
            Err(e) => e,
        };
        match err.downcast_ref::<AppError>() {
            Some(app) if app.is_user_error() => {
                writeln!(out, "{}", app)?;
                Ok(Flow::Continue)
            }
            _ if is_export => {
                writeln!(out, "Export failed: {:#}", err)?;
                Ok(Flow::Continue)
            }
            _ => Err(err),
        }
    }

    fn dispatch<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<Flow> {
        match command {
            ShellCommand::Login { username, pin } => {
                let username = self.service.login(&username, &pin)?;
                writeln!(out, "Logged in as {}", username)?;
            }

            ShellCommand::Logout => match self.service.logout() {
                Some(username) => writeln!(out, "Logged out {}", username)?,
                None => writeln!(out, "Nobody is logged in")?,
            },

            ShellCommand::Balance => {
                let dashboard = self.service.dashboard()?;
                writeln!(out, "Acc. Holder Name:  {}", dashboard.username)?;
                writeln!(out, "Balance: {}", self.service.format(dashboard.balance))?;
            }

            ShellCommand::Deposit { amount } => {
                let receipt = self.service.deposit(&amount)?;
                writeln!(out, "{}", self.service.message(&receipt))?;
            }

            ShellCommand::Withdraw { amount } => {
                let receipt = self.service.withdraw(&amount)?;
                writeln!(out, "{}", self.service.message(&receipt))?;
            }

            ShellCommand::Transfer { to, amount } => {
                let receipt = self.service.transfer(&to, &amount)?;
                writeln!(out, "{}", self.service.message(&receipt))?;
            }

            ShellCommand::History => self.print_history(out)?,

            ShellCommand::Export { target, output } => self.export(target, output.as_deref(), out)?,

            ShellCommand::Accounts => {
                for account in self.service.ledger().accounts() {
                    writeln!(out, "{}", account.username)?;
                }
            }

            ShellCommand::Help => writeln!(out, "{}", HELP)?,

            ShellCommand::Quit => {
                writeln!(out, "Goodbye")?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn print_history<W: Write>(&self, out: &mut W) -> Result<()> {
        let history = self.service.history()?;
        if history.is_empty() {
            writeln!(out, "No transactions yet")?;
            return Ok(());
        }

        writeln!(out, "{:<18} {:<28} {:>12}", "DATE", "TYPE", "AMOUNT")?;
        writeln!(out, "{}", "-".repeat(60))?;
        for tx in history {
            let sign = if tx.is_money_in() { "+" } else { "-" };
            writeln!(
                out,
                "{:<18} {:<28} {:>12}",
                tx.date,
                tx.label(),
                format!("{}{}", sign, self.service.format(tx.amount))
            )?;
        }
        Ok(())
    }

    fn export<W: Write>(&self, target: ExportTarget, output: Option<&str>, out: &mut W) -> Result<()> {
        let username = self
            .service
            .current_user()
            .ok_or(AppError::NotLoggedIn)?
            .to_string();
        let exporter = Exporter::new(self.service.ledger());

        match output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path))?;
                let (count, what) = match target {
                    ExportTarget::HistoryCsv => {
                        (exporter.export_history_csv(&username, file)?, "transactions")
                    }
                    ExportTarget::HistoryJson => (
                        exporter.export_history_json(&username, file)?.transactions.len(),
                        "transactions",
                    ),
                    ExportTarget::BalancesCsv => (exporter.export_balances_csv(file)?, "balances"),
                };
                writeln!(out, "Exported {} {} to {}", count, what, path)?;
            }
            None => match target {
                ExportTarget::HistoryCsv => {
                    exporter.export_history_csv(&username, &mut *out)?;
                }
                ExportTarget::HistoryJson => {
                    exporter.export_history_json(&username, &mut *out)?;
                }
                ExportTarget::BalancesCsv => {
                    exporter.export_balances_csv(&mut *out)?;
                }
            },
        }
        Ok(())
    }
}
