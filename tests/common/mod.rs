// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use pocketbank::application::{BankConfig, BankService};
use pocketbank::domain::{default_accounts, Ledger, Units};
use tempfile::NamedTempFile;

/// Ledger seeded with Admin:10000, User1:5000, User2:7000
pub fn seeded_ledger() -> Ledger {
    Ledger::from_seed(&default_accounts()).unwrap()
}

/// Service with the default config, already logged in as `username`
pub fn logged_in(username: &str) -> Result<BankService> {
    let mut service = BankService::new(&BankConfig::default())?;
    service.login(username, "1234")?;
    Ok(service)
}

/// Helper to build a local timestamp
pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Balances of every account, in seed order
pub fn balances(ledger: &Ledger) -> Vec<(String, Units)> {
    ledger
        .accounts()
        .iter()
        .map(|a| (a.username.clone(), a.balance))
        .collect()
}

/// Write `contents` to a temporary file that lives as long as the handle
pub fn temp_file(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}
