use super::ledger::{assert_vault_error, Harness};
use crate::custody::Caller;
use crate::errors::VaultError;
use crate::state::Vault;
use crate::token::{TransferAuthority, TransferRequest};

#[test]
fn deposit_after_initialize_adds_to_seed() {
    let mut harness = Harness::initialized(1_000, 10);

    harness.deposit(5).unwrap();

    assert_eq!(harness.record.deposited_amount, 15);
    assert_eq!(
        harness.ledger.transfers.last(),
        Some(&TransferRequest {
            source: harness.owner_token_account,
            destination: harness.addresses.vault_token_account,
            authority: TransferAuthority::Signer(harness.owner),
            amount: 5,
        })
    );
    harness.assert_books_balance();
}

#[test]
fn deposits_accumulate_in_order_without_loss() {
    let mut harness = Harness::initialized(10_000, 10);
    let amounts = [1, 7, 250, 3, 1_000];

    for amount in amounts {
        harness.deposit(amount).unwrap();
        harness.assert_books_balance();
    }

    assert_eq!(
        harness.record.deposited_amount,
        10 + amounts.iter().sum::<u64>()
    );
    assert_eq!(harness.ledger.balance(&harness.owner_token_account), 10_000 - 1_271);
}

#[test]
fn zero_deposit_is_invalid() {
    let mut harness = Harness::initialized(1_000, 10);

    assert_vault_error(harness.deposit(0), VaultError::InvalidAmount);
    assert_eq!(harness.record.deposited_amount, 10);
}

#[test]
fn deposit_beyond_owner_balance_changes_nothing() {
    let mut harness = Harness::initialized(100, 10);

    assert_vault_error(harness.deposit(91), VaultError::InsufficientCallerBalance);

    assert_eq!(harness.record.deposited_amount, 10);
    assert_eq!(harness.ledger.transfers.len(), 1);
    harness.assert_books_balance();
}

#[test]
fn deposit_into_uninitialized_vault_fails() {
    let mut harness = Harness::new(1_000);

    assert_vault_error(harness.deposit(5), VaultError::NotInitialized);
    assert!(harness.ledger.transfers.is_empty());
}

#[test]
fn only_the_owner_may_deposit() {
    let mut harness = Harness::initialized(1_000, 10);
    let (intruder, intruder_account) = harness.open_sender(1_000);
    let mut accounts = harness.owner_accounts();
    accounts.owner = Caller::signer(intruder);
    accounts.owner_token_account = harness.ledger.account(&intruder_account);

    assert_vault_error(harness.deposit_with(&accounts, 5), VaultError::Unauthorized);
    assert_eq!(harness.record.deposited_amount, 10);
}

#[test]
fn unsigned_owner_cannot_deposit() {
    let mut harness = Harness::initialized(1_000, 10);
    let mut accounts = harness.owner_accounts();
    accounts.owner.is_signer = false;

    assert_vault_error(harness.deposit_with(&accounts, 5), VaultError::Unauthorized);
}

#[test]
fn deposit_that_would_overflow_the_record_is_rejected_before_transfer() {
    let mut harness = Harness::initialized(1_000, 10);
    harness.record = Vault {
        deposited_amount: u64::MAX - 1,
        ..harness.record.clone()
    };

    assert_vault_error(harness.deposit(5), VaultError::Overflow);
    assert_eq!(harness.ledger.transfers.len(), 1);
}
