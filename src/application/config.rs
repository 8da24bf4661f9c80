use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{
    default_accounts, validate_date_format, validate_seed, SeedAccount, DEFAULT_CURRENCY_SYMBOL,
    DEFAULT_DATE_FORMAT,
};

use super::AppError;

/// PIN accepted for every demo account.
pub const DEFAULT_PIN: &str = "1234";

/// Session configuration. Every field has a default, so an empty JSON
/// object is a valid config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BankConfig {
    pub accounts: Vec<SeedAccount>,
    pub pin: String,
    pub currency_symbol: String,
    /// chrono strftime pattern for transaction dates
    pub date_format: String,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            pin: DEFAULT_PIN.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl BankConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BankConfig = serde_json::from_str(json).context("Malformed config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_json(&json)
                    .with_context(|| format!("Failed to load config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_seed(&self.accounts)?;
        if self.pin.is_empty() {
            return Err(AppError::Config("pin cannot be empty".into()));
        }
        validate_date_format(&self.date_format)?;
        Ok(())
    }
}
