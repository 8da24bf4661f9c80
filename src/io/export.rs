use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{Ledger, Transaction, Units};

/// One account's state for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub username: String,
    pub balance: Units,
    pub transactions: Vec<Transaction>,
}

/// Exporter for writing ledger data to CSV or JSON
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Export one account's history to CSV, in log order
    pub fn export_history_csv<W: Write>(&self, username: &str, writer: W) -> Result<usize> {
        let history = self
            .ledger
            .history(username)
            .with_context(|| format!("Cannot export history of {}", username))?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "recorded_at",
            "type",
            "amount",
            "money_in",
        ])?;

        for tx in history {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.date.clone(),
                tx.recorded_at.to_rfc3339(),
                tx.label(),
                tx.amount.to_string(),
                tx.is_money_in().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(history.len())
    }

    /// Export every account's balance to CSV
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["username", "balance", "transactions"])?;

        for account in self.ledger.accounts() {
            csv_writer.write_record([
                account.username.clone(),
                account.balance.to_string(),
                account.transactions.len().to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.ledger.accounts().len())
    }

    /// Export one account as a pretty-printed JSON snapshot
    pub fn export_history_json<W: Write>(
        &self,
        username: &str,
        mut writer: W,
    ) -> Result<AccountSnapshot> {
        let account = self
            .ledger
            .account(username)
            .with_context(|| format!("Account not found: {}", username))?;

        let snapshot = AccountSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            username: account.username.clone(),
            balance: account.balance,
            transactions: account.transactions.clone(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}
