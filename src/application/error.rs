use thiserror::Error;

use crate::domain::{InvalidDateFormat, LedgerError, SeedError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid seed accounts: {0}")]
    Seed(#[from] SeedError),

    #[error("Invalid configuration: {0}")]
    DateFormat(#[from] InvalidDateFormat),
}

impl AppError {
    /// True for errors caused by what the user typed, which the shell
    /// reports and then keeps running.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Ledger(_) | AppError::InvalidCredentials | AppError::NotLoggedIn
        )
    }
}
