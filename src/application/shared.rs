use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Account, Ledger, LedgerError, Receipt, Units};

/// Ledger handle for callers on several threads.
///
/// One global lock is held for the whole of each operation, so validation
/// and mutation never interleave with another caller.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn deposit(&self, username: &str, amount: &str) -> Result<Receipt, LedgerError> {
        self.inner.lock().deposit(username, amount)
    }

    pub fn withdraw(&self, username: &str, amount: &str) -> Result<Receipt, LedgerError> {
        self.inner.lock().withdraw(username, amount)
    }

    pub fn transfer(&self, sender: &str, receiver: &str, amount: &str) -> Result<Receipt, LedgerError> {
        self.inner.lock().transfer(sender, receiver, amount)
    }

    pub fn balance(&self, username: &str) -> Result<Units, LedgerError> {
        self.inner.lock().balance(username)
    }

    pub fn total_balance(&self) -> Units {
        self.inner.lock().total_balance()
    }

    /// Copy of one account, taken under the lock
    pub fn snapshot(&self, username: &str) -> Option<Account> {
        self.inner.lock().account(username).cloned()
    }

    /// Run a closure with exclusive access to the ledger.
    pub fn with<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
