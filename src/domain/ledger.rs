use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, info};

use super::{
    format_units_compact, parse_amount, validate_date_format, validate_seed, Account,
    InvalidDateFormat, SeedAccount, SeedError, Transaction, TransactionKind, Units,
    DEFAULT_DATE_FORMAT,
};

/// Validation outcomes of ledger operations. All of them are detected
/// before any balance or history is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Cannot transfer to yourself")]
    SelfTransfer,
}

/// Result of a successful ledger operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receipt {
    Deposited {
        username: String,
        amount: Units,
        balance: Units,
    },
    Withdrawn {
        username: String,
        amount: Units,
        balance: Units,
    },
    Transferred {
        from: String,
        to: String,
        amount: Units,
        sender_balance: Units,
        receiver_balance: Units,
    },
}

impl Receipt {
    pub fn amount(&self) -> Units {
        match self {
            Receipt::Deposited { amount, .. }
            | Receipt::Withdrawn { amount, .. }
            | Receipt::Transferred { amount, .. } => *amount,
        }
    }

    /// Success message for the presentation layer.
    pub fn message(&self, symbol: &str) -> String {
        match self {
            Receipt::Deposited { amount, .. } => {
                format!("Successfully deposited {}", format_units_compact(*amount, symbol))
            }
            Receipt::Withdrawn { amount, .. } => {
                format!("Successfully withdrawn {}", format_units_compact(*amount, symbol))
            }
            Receipt::Transferred { to, amount, .. } => {
                format!("Transferred {} to {}", format_units_compact(*amount, symbol), to)
            }
        }
    }
}

/// In-memory ledger owning every account of the session.
///
/// Each operation validates first and mutates only when every check passed,
/// so a failed call leaves balances and histories exactly as they were.
#[derive(Debug, Clone)]
pub struct Ledger {
    accounts: Vec<Account>,
    date_format: String,
}

impl Ledger {
    /// Build a ledger from seed accounts, keeping their order.
    pub fn from_seed(seed: &[SeedAccount]) -> Result<Self, SeedError> {
        validate_seed(seed)?;
        let accounts = seed
            .iter()
            .map(|s| Account::new(s.username.clone(), s.balance))
            .collect();
        Ok(Self {
            accounts,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        })
    }

    /// Use another strftime pattern for transaction dates. The pattern is
    /// checked here so that recording a transaction cannot fail on it.
    pub fn with_date_format(
        mut self,
        date_format: impl Into<String>,
    ) -> Result<Self, InvalidDateFormat> {
        let date_format = date_format.into();
        validate_date_format(&date_format)?;
        self.date_format = date_format;
        Ok(self)
    }

    // ========================
    // Queries
    // ========================

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Find an account, ignoring ASCII case.
    pub fn account(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.matches(username))
    }

    pub fn balance(&self, username: &str) -> Result<Units, LedgerError> {
        self.account(username)
            .map(|a| a.balance)
            .ok_or_else(|| LedgerError::UserNotFound(username.to_string()))
    }

    pub fn history(&self, username: &str) -> Result<&[Transaction], LedgerError> {
        self.account(username)
            .map(|a| a.transactions.as_slice())
            .ok_or_else(|| LedgerError::UserNotFound(username.to_string()))
    }

    /// Sum of every account balance
    pub fn total_balance(&self) -> Units {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    fn position(&self, username: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a.matches(username))
    }

    fn require(&self, username: &str) -> Result<usize, LedgerError> {
        self.position(username)
            .ok_or_else(|| LedgerError::UserNotFound(username.to_string()))
    }

    fn transaction(&self, kind: TransactionKind, amount: Units, at: DateTime<Local>) -> Transaction {
        Transaction::new(kind, amount, at, &self.date_format)
    }

    // ========================
    // Balance-changing operations
    // ========================

    pub fn deposit(&mut self, username: &str, amount: &str) -> Result<Receipt, LedgerError> {
        self.deposit_at(username, amount, Local::now())
    }

    /// Deposit with an explicit timestamp for the recorded transaction.
    pub fn deposit_at(
        &mut self,
        username: &str,
        amount: &str,
        at: DateTime<Local>,
    ) -> Result<Receipt, LedgerError> {
        let amount = checked_amount(amount)?;
        let idx = self.require(username)?;
        let balance = self.accounts[idx]
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount)?;

        let tx = self.transaction(TransactionKind::Deposit, amount, at);
        let account = &mut self.accounts[idx];
        account.balance = balance;
        account.transactions.push(tx);

        info!(user = %account.username, amount, balance, "deposit recorded");
        Ok(Receipt::Deposited {
            username: account.username.clone(),
            amount,
            balance,
        })
    }

    pub fn withdraw(&mut self, username: &str, amount: &str) -> Result<Receipt, LedgerError> {
        self.withdraw_at(username, amount, Local::now())
    }

    /// Withdraw with an explicit timestamp for the recorded transaction.
    pub fn withdraw_at(
        &mut self,
        username: &str,
        amount: &str,
        at: DateTime<Local>,
    ) -> Result<Receipt, LedgerError> {
        let amount = checked_amount(amount)?;
        let idx = self.require(username)?;
        if amount > self.accounts[idx].balance {
            debug!(user = username, amount, "withdraw rejected: insufficient balance");
            return Err(LedgerError::InsufficientBalance);
        }

        let tx = self.transaction(TransactionKind::Withdraw, amount, at);
        let account = &mut self.accounts[idx];
        account.balance -= amount;
        account.transactions.push(tx);

        info!(user = %account.username, amount, balance = account.balance, "withdrawal recorded");
        Ok(Receipt::Withdrawn {
            username: account.username.clone(),
            amount,
            balance: account.balance,
        })
    }

    pub fn transfer(
        &mut self,
        sender: &str,
        receiver: &str,
        amount: &str,
    ) -> Result<Receipt, LedgerError> {
        self.transfer_at(sender, receiver, amount, Local::now())
    }

    /// Move money between two accounts.
    ///
    /// Checks run in this order and the first failure wins: amount, receiver
    /// lookup, self-transfer, sender balance. Both history entries are
    /// prepended so each log reads newest-first.
    pub fn transfer_at(
        &mut self,
        sender: &str,
        receiver: &str,
        amount: &str,
        at: DateTime<Local>,
    ) -> Result<Receipt, LedgerError> {
        let amount = checked_amount(amount)?;
        let from = self.require(sender)?;
        let to = self.position(receiver).ok_or_else(|| {
            debug!(user = sender, receiver, "transfer rejected: unknown receiver");
            LedgerError::UserNotFound(receiver.to_string())
        })?;
        if from == to {
            return Err(LedgerError::SelfTransfer);
        }
        if self.accounts[from].balance < amount {
            debug!(user = sender, amount, "transfer rejected: insufficient balance");
            return Err(LedgerError::InsufficientBalance);
        }
        let receiver_balance = self.accounts[to]
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount)?;

        let from_name = self.accounts[from].username.clone();
        let to_name = self.accounts[to].username.clone();
        let sent = self.transaction(TransactionKind::TransferredTo(to_name.clone()), amount, at);
        let received =
            self.transaction(TransactionKind::TransferReceived(from_name.clone()), amount, at);

        let sender_account = &mut self.accounts[from];
        sender_account.balance -= amount;
        sender_account.transactions.insert(0, sent);
        let sender_balance = sender_account.balance;

        let receiver_account = &mut self.accounts[to];
        receiver_account.balance = receiver_balance;
        receiver_account.transactions.insert(0, received);

        info!(from = %from_name, to = %to_name, amount, "transfer recorded");
        Ok(Receipt::Transferred {
            from: from_name,
            to: to_name,
            amount,
            sender_balance,
            receiver_balance,
        })
    }
}

fn checked_amount(input: &str) -> Result<Units, LedgerError> {
    parse_amount(input).map_err(|e| {
        debug!(input, reason = %e, "rejected amount");
        LedgerError::InvalidAmount
    })
}
