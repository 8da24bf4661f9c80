use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Units;

pub type TransactionId = Uuid;

/// Default pattern for the human-readable transaction date, e.g. "05 Mar, 02:30 PM".
pub const DEFAULT_DATE_FORMAT: &str = "%d %b, %I:%M %p";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("date format '{0}' is not a valid strftime pattern")]
pub struct InvalidDateFormat(pub String);

/// Check a chrono strftime pattern before it is used to format dates,
/// since formatting with a bad pattern panics.
pub fn validate_date_format(pattern: &str) -> Result<(), InvalidDateFormat> {
    if pattern.trim().is_empty()
        || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
    {
        return Err(InvalidDateFormat(pattern.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "counterparty", rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    /// Outgoing transfer, holds the receiver's username
    TransferredTo(String),
    /// Incoming transfer, holds the sender's username
    TransferReceived(String),
}

impl TransactionKind {
    /// Label shown in the transaction history.
    pub fn label(&self) -> String {
        match self {
            TransactionKind::Deposit => "Deposit".to_string(),
            TransactionKind::Withdraw => "Withdraw".to_string(),
            TransactionKind::TransferredTo(receiver) => format!("Transferred to {}", receiver),
            TransactionKind::TransferReceived(_) => "Transfer Received".to_string(),
        }
    }

    /// Returns true if money entered the account
    pub fn is_money_in(&self) -> bool {
        matches!(
            self,
            TransactionKind::Deposit | TransactionKind::TransferReceived(_)
        )
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An immutable record of one balance-changing event on an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Always positive
    pub amount: Units,
    /// Formatted at creation time and never re-rendered
    pub date: String,
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: Units, at: DateTime<Local>, date_format: &str) -> Self {
        assert!(amount > 0, "Transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            date: at.format(date_format).to_string(),
            recorded_at: at.with_timezone(&Utc),
        }
    }

    pub fn label(&self) -> String {
        self.kind.label()
    }

    pub fn is_money_in(&self) -> bool {
        self.kind.is_money_in()
    }
}
