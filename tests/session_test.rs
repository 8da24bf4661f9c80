mod common;

use anyhow::Result;
use common::logged_in;
use pocketbank::application::{AppError, BankConfig, BankService, Session};
use pocketbank::domain::{LedgerError, SeedAccount};

#[test]
fn test_login_any_case_then_transfer_any_case() -> Result<()> {
    let mut service = logged_in("ADMIN")?;
    assert_eq!(service.current_user(), Some("Admin"));

    let receipt = service.transfer("uSeR1", "250")?;
    assert_eq!(service.message(&receipt), "Transferred ₹250 to User1");
    assert_eq!(service.ledger().balance("User1")?, 5250);
    Ok(())
}

#[test]
fn test_user_not_found_message() -> Result<()> {
    let mut service = logged_in("User2")?;
    let err = service.transfer("Bob", "10").unwrap_err();
    assert!(matches!(
        err,
        AppError::Ledger(LedgerError::UserNotFound(ref name)) if name == "Bob"
    ));
    assert_eq!(err.to_string(), "User 'Bob' not found");
    Ok(())
}

#[test]
fn test_switching_users_keeps_state() -> Result<()> {
    let mut service = logged_in("User1")?;
    service.withdraw("1000")?;
    service.logout();
    assert_eq!(service.session(), &Session::LoggedOut);

    service.login("user2", "1234")?;
    service.deposit("1")?;
    assert_eq!(service.dashboard()?.balance, 7001);

    service.login("user1", "1234")?;
    let history = service.history()?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].label(), "Withdraw");
    assert_eq!(service.dashboard()?.balance, 4000);
    Ok(())
}

#[test]
fn test_custom_config() -> Result<()> {
    let config = BankConfig {
        accounts: vec![SeedAccount::new("alice", 100), SeedAccount::new("bob", 0)],
        pin: "0000".into(),
        currency_symbol: "€".into(),
        ..BankConfig::default()
    };
    let mut service = BankService::new(&config)?;

    assert!(matches!(
        service.login("alice", "1234"),
        Err(AppError::InvalidCredentials)
    ));
    service.login("Alice", "0000")?;
    let receipt = service.withdraw("100")?;
    assert_eq!(service.message(&receipt), "Successfully withdrawn €100");
    assert_eq!(service.format(service.dashboard()?.balance), "€ 0");
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = BankConfig {
        accounts: vec![SeedAccount::new("Twin", 1), SeedAccount::new("twin", 1)],
        ..BankConfig::default()
    };
    assert!(matches!(BankService::new(&config), Err(AppError::Seed(_))));
}
