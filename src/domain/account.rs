use serde::{Deserialize, Serialize};

use super::{Transaction, Units};

/// A named holder of a balance and transaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    /// Never negative
    pub balance: Units,
    /// Deposits and withdrawals are appended, transfers are prepended
    pub transactions: Vec<Transaction>,
}

impl Account {
    pub fn new(username: impl Into<String>, balance: Units) -> Self {
        assert!(balance >= 0, "Opening balance cannot be negative");
        Self {
            username: username.into(),
            balance,
            transactions: Vec::new(),
        }
    }

    /// Usernames compare without regard to ASCII case.
    pub fn matches(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username)
    }

    pub fn has_transactions(&self) -> bool {
        !self.transactions.is_empty()
    }
}
