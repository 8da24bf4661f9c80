mod common;

use common::{balances, local, seeded_ledger};
use pocketbank::domain::{LedgerError, Receipt, Units};

#[test]
fn test_reference_scenario() {
    let mut ledger = seeded_ledger();

    ledger.deposit("Admin", "500").unwrap();
    assert_eq!(ledger.balance("Admin"), Ok(10500));

    assert_eq!(
        ledger.withdraw("User1", "6000"),
        Err(LedgerError::InsufficientBalance)
    );
    assert_eq!(ledger.balance("User1"), Ok(5000));
    assert!(ledger.history("User1").unwrap().is_empty());

    ledger.transfer("Admin", "User2", "1000").unwrap();
    assert_eq!(
        balances(&ledger),
        vec![
            ("Admin".to_string(), 9500),
            ("User1".to_string(), 5000),
            ("User2".to_string(), 8000),
        ]
    );
}

#[test]
fn test_deposit_adds_exactly_one_entry() {
    let mut ledger = seeded_ledger();
    for (i, amount) in [1, 250, 9999].iter().enumerate() {
        let before = ledger.balance("User2").unwrap();
        ledger.deposit("User2", &amount.to_string()).unwrap();
        assert_eq!(ledger.balance("User2").unwrap(), before + amount);

        let history = ledger.history("User2").unwrap();
        assert_eq!(history.len(), i + 1);
        assert_eq!(history.last().unwrap().amount, *amount);
        assert_eq!(history.last().unwrap().label(), "Deposit");
    }
}

#[test]
fn test_invalid_amounts_never_mutate() {
    let mut ledger = seeded_ledger();
    let before = balances(&ledger);

    for input in ["", " ", "abc", "0", "-1", "-500", "10.5", "1e3", "5 5", "0x10"] {
        assert_eq!(ledger.deposit("Admin", input), Err(LedgerError::InvalidAmount));
        assert_eq!(ledger.withdraw("Admin", input), Err(LedgerError::InvalidAmount));
        assert_eq!(
            ledger.transfer("Admin", "User1", input),
            Err(LedgerError::InvalidAmount)
        );
    }

    assert_eq!(balances(&ledger), before);
    assert!(ledger.accounts().iter().all(|a| a.transactions.is_empty()));
}

#[test]
fn test_self_transfer_regardless_of_balance() {
    let mut ledger = seeded_ledger();
    for amount in ["1", "10000", "10000000"] {
        assert_eq!(
            ledger.transfer("Admin", "Admin", amount),
            Err(LedgerError::SelfTransfer)
        );
    }
}

#[test]
fn test_transfer_history_is_newest_first() {
    let mut ledger = seeded_ledger();
    ledger
        .transfer_at("Admin", "User1", "100", local(2024, 3, 5, 9, 0))
        .unwrap();
    ledger
        .transfer_at("Admin", "User2", "200", local(2024, 3, 5, 10, 0))
        .unwrap();
    ledger
        .transfer_at("User2", "User1", "50", local(2024, 3, 5, 11, 0))
        .unwrap();

    let admin: Vec<String> = ledger
        .history("Admin")
        .unwrap()
        .iter()
        .map(|t| t.label())
        .collect();
    assert_eq!(admin, vec!["Transferred to User2", "Transferred to User1"]);

    let user1 = ledger.history("User1").unwrap();
    assert_eq!(user1.len(), 2);
    assert_eq!(user1[0].amount, 50);
    assert_eq!(user1[0].date, "05 Mar, 11:00 AM");
    assert_eq!(user1[1].amount, 100);
    assert!(user1.iter().all(|t| t.is_money_in()));
}

#[test]
fn test_total_changes_only_by_deposits_and_withdrawals() {
    let mut ledger = seeded_ledger();
    let mut expected: Units = ledger.total_balance();

    let ops: Vec<(&str, &str, &str, &str)> = vec![
        ("deposit", "User1", "", "300"),
        ("transfer", "User1", "Admin", "5300"),
        ("withdraw", "Admin", "", "15000"),
        ("transfer", "User2", "user1", "7000"),
        ("withdraw", "User2", "", "1"),
        ("transfer", "Admin", "User2", "999999"),
        ("deposit", "User2", "", "42"),
    ];

    for (op, who, target, amount) in ops {
        let result = match op {
            "deposit" => ledger.deposit(who, amount),
            "withdraw" => ledger.withdraw(who, amount),
            _ => ledger.transfer(who, target, amount),
        };
        match result {
            Ok(Receipt::Deposited { amount, .. }) => expected += amount,
            Ok(Receipt::Withdrawn { amount, .. }) => expected -= amount,
            Ok(Receipt::Transferred { .. }) | Err(_) => {}
        }
        assert_eq!(ledger.total_balance(), expected);
        assert!(ledger.accounts().iter().all(|a| a.balance >= 0));
    }

    assert_eq!(
        balances(&ledger),
        vec![
            ("Admin".to_string(), 300),
            ("User1".to_string(), 7000),
            ("User2".to_string(), 42),
        ]
    );
}
