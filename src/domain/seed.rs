use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Units;

/// An account the ledger starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccount {
    pub username: String,
    pub balance: Units,
}

impl SeedAccount {
    pub fn new(username: impl Into<String>, balance: Units) -> Self {
        Self {
            username: username.into(),
            balance,
        }
    }
}

/// The fixed accounts every session starts with.
pub fn default_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount::new("Admin", 10000),
        SeedAccount::new("User1", 5000),
        SeedAccount::new("User2", 7000),
    ]
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("No accounts to seed")]
    Empty,

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("Negative opening balance for {username}: {balance}")]
    NegativeBalance { username: String, balance: Units },
}

/// Check a seed list before building a ledger from it.
/// Usernames must be non-blank and unique ignoring ASCII case.
pub fn validate_seed(accounts: &[SeedAccount]) -> Result<(), SeedError> {
    if accounts.is_empty() {
        return Err(SeedError::Empty);
    }

    for (i, account) in accounts.iter().enumerate() {
        if account.username.trim().is_empty() {
            return Err(SeedError::EmptyUsername);
        }
        if account.balance < 0 {
            return Err(SeedError::NegativeBalance {
                username: account.username.clone(),
                balance: account.balance,
            });
        }
        if accounts[..i]
            .iter()
            .any(|prev| prev.username.eq_ignore_ascii_case(&account.username))
        {
            return Err(SeedError::DuplicateUsername(account.username.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accounts() {
        let accounts = default_accounts();
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0], SeedAccount::new("Admin", 10000));
        assert_eq!(accounts[1], SeedAccount::new("User1", 5000));
        assert_eq!(accounts[2], SeedAccount::new("User2", 7000));
        assert!(validate_seed(&accounts).is_ok());
    }

    #[test]
    fn test_duplicate_usernames_ignore_case() {
        let accounts = vec![SeedAccount::new("Admin", 1), SeedAccount::new("admin", 2)];
        assert_eq!(
            validate_seed(&accounts),
            Err(SeedError::DuplicateUsername("admin".into()))
        );
    }

    #[test]
    fn test_invalid_seeds() {
        assert_eq!(validate_seed(&[]), Err(SeedError::Empty));
        assert_eq!(
            validate_seed(&[SeedAccount::new("  ", 1)]),
            Err(SeedError::EmptyUsername)
        );
        assert!(matches!(
            validate_seed(&[SeedAccount::new("Admin", -10)]),
            Err(SeedError::NegativeBalance { balance: -10, .. })
        ));
    }
}
