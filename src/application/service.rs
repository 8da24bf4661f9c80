use tracing::{debug, info};

use crate::domain::{format_units, Ledger, Receipt, Transaction, Units};

use super::{AppError, BankConfig};

/// Who is using the bank right now.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn { username: String },
}

/// What the dashboard shows for the logged-in account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub username: String,
    pub balance: Units,
}

/// Application service providing the bank's user-facing operations.
/// This is the primary interface for any client (CLI shell, demo, tests).
#[derive(Debug)]
pub struct BankService {
    ledger: Ledger,
    session: Session,
    pin: String,
    currency_symbol: String,
}

impl BankService {
    /// Build a service with a fresh ledger seeded from the config.
    pub fn new(config: &BankConfig) -> Result<Self, AppError> {
        config.validate()?;
        let ledger = Ledger::from_seed(&config.accounts)?.with_date_format(&config.date_format)?;
        Ok(Self {
            ledger,
            session: Session::LoggedOut,
            pin: config.pin.clone(),
            currency_symbol: config.currency_symbol.clone(),
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Format an amount with the configured currency symbol.
    pub fn format(&self, units: Units) -> String {
        format_units(units, &self.currency_symbol)
    }

    // ========================
    // Session operations
    // ========================

    /// Log in with a username (any case) and the shared PIN.
    /// Returns the account's canonical username.
    pub fn login(&mut self, username: &str, pin: &str) -> Result<String, AppError> {
        let account = self
            .ledger
            .account(username.trim())
            .filter(|_| pin == self.pin)
            .ok_or_else(|| {
                debug!(username, "login rejected");
                AppError::InvalidCredentials
            })?;

        let username = account.username.clone();
        info!(user = %username, "logged in");
        self.session = Session::LoggedIn {
            username: username.clone(),
        };
        Ok(username)
    }

    /// Log out, returning who was logged in.
    pub fn logout(&mut self) -> Option<String> {
        match std::mem::take(&mut self.session) {
            Session::LoggedIn { username } => {
                info!(user = %username, "logged out");
                Some(username)
            }
            Session::LoggedOut => None,
        }
    }

    pub fn current_user(&self) -> Option<&str> {
        match &self.session {
            Session::LoggedIn { username } => Some(username),
            Session::LoggedOut => None,
        }
    }

    fn require_user(&self) -> Result<String, AppError> {
        self.current_user()
            .map(str::to_string)
            .ok_or(AppError::NotLoggedIn)
    }

    // ========================
    // Account operations
    // ========================

    pub fn dashboard(&self) -> Result<Dashboard, AppError> {
        let username = self.require_user()?;
        let balance = self.ledger.balance(&username)?;
        Ok(Dashboard { username, balance })
    }

    pub fn history(&self) -> Result<&[Transaction], AppError> {
        let username = self.require_user()?;
        Ok(self.ledger.history(&username)?)
    }

    pub fn deposit(&mut self, amount: &str) -> Result<Receipt, AppError> {
        let username = self.require_user()?;
        Ok(self.ledger.deposit(&username, amount)?)
    }

    pub fn withdraw(&mut self, amount: &str) -> Result<Receipt, AppError> {
        let username = self.require_user()?;
        Ok(self.ledger.withdraw(&username, amount)?)
    }

    pub fn transfer(&mut self, receiver: &str, amount: &str) -> Result<Receipt, AppError> {
        let username = self.require_user()?;
        Ok(self.ledger.transfer(&username, receiver.trim(), amount)?)
    }

    /// Success message for a receipt, using the configured currency symbol.
    pub fn message(&self, receipt: &Receipt) -> String {
        receipt.message(&self.currency_symbol)
    }
}
