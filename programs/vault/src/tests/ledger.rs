use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::custody::{Caller, Custody, InterestAccounts, OwnerAccounts};
use crate::derivation::{RuntimeDeriver, VaultAddresses, AUTHORITY_SEED};
use crate::errors::VaultError;
use crate::state::Vault;
use crate::token::{TokenAccountState, TokenTransfer, TransferAuthority, TransferRequest};

/// Deterministic stand-in for the SPL Token program.
///
/// Enforces the same rules the runtime would: the authority must hold the
/// source account, a PDA authority must be reproducible from its signer
/// seeds, and balances never go negative. Every successful transfer is logged.
pub struct InMemoryLedger {
    program_id: Pubkey,
    accounts: HashMap<Pubkey, TokenAccountState>,
    pub transfers: Vec<TransferRequest>,
}

impl InMemoryLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: HashMap::new(),
            transfers: Vec::new(),
        }
    }

    pub fn open_account(&mut self, holder: Pubkey, mint: Pubkey, amount: u64) -> Pubkey {
        let address = Pubkey::new_unique();
        self.open_account_at(address, holder, mint, amount);
        address
    }

    pub fn open_account_at(&mut self, address: Pubkey, holder: Pubkey, mint: Pubkey, amount: u64) {
        self.accounts.insert(
            address,
            TokenAccountState {
                address,
                mint,
                owner: holder,
                amount,
            },
        );
    }

    pub fn account(&self, address: &Pubkey) -> TokenAccountState {
        self.accounts
            .get(address)
            .copied()
            .unwrap_or_else(|| panic!("unknown token account {address}"))
    }

    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.account(address).amount
    }

    fn authority_signed(&self, request: &TransferRequest, source: &TokenAccountState) -> bool {
        match &request.authority {
            TransferAuthority::Signer(key) => &source.owner == key,
            TransferAuthority::VaultAuthority {
                address,
                vault,
                bump,
            } => {
                let signs_for = Pubkey::create_program_address(
                    &[AUTHORITY_SEED, vault.as_ref(), &[*bump]],
                    &self.program_id,
                )
                .map_or(false, |pda| &pda == address);
                signs_for && &source.owner == address
            }
        }
    }
}

impl TokenTransfer for InMemoryLedger {
    fn transfer(&mut self, request: &TransferRequest) -> Result<()> {
        let source = self.account(&request.source);
        let destination = self.account(&request.destination);

        require_keys_eq!(source.mint, destination.mint, VaultError::InvalidTokenAccount);
        require!(
            self.authority_signed(request, &source),
            VaultError::Unauthorized
        );
        require!(
            source.amount >= request.amount,
            VaultError::InsufficientCallerBalance
        );

        if let Some(account) = self.accounts.get_mut(&request.source) {
            account.amount -= request.amount;
        }
        if let Some(account) = self.accounts.get_mut(&request.destination) {
            account.amount += request.amount;
        }
        self.transfers.push(*request);
        Ok(())
    }
}

/// One vault under test: an owner, a mint, and a ledger holding the owner's
/// tokens and the (empty) vault token account.
pub struct Harness {
    pub program_id: Pubkey,
    pub ledger: InMemoryLedger,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub owner_token_account: Pubkey,
    pub addresses: VaultAddresses,
    pub record: Vault,
}

impl Harness {
    pub fn new(owner_balance: u64) -> Self {
        let program_id = crate::ID;
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let addresses = VaultAddresses::find(&owner, &mint, &program_id, &RuntimeDeriver);

        let mut ledger = InMemoryLedger::new(program_id);
        let owner_token_account = ledger.open_account(owner, mint, owner_balance);
        ledger.open_account_at(addresses.vault_token_account, addresses.vault_authority, mint, 0);

        Self {
            program_id,
            ledger,
            owner,
            mint,
            owner_token_account,
            addresses,
            record: Vault::default(),
        }
    }

    /// Harness with an already initialized vault.
    pub fn initialized(owner_balance: u64, seed_amount: u64) -> Self {
        let mut harness = Self::new(owner_balance);
        harness
            .initialize(seed_amount)
            .expect("initialize should succeed");
        harness
    }

    /// A funded third party who can contribute interest.
    pub fn open_sender(&mut self, balance: u64) -> (Pubkey, Pubkey) {
        let sender = Pubkey::new_unique();
        let token_account = self.ledger.open_account(sender, self.mint, balance);
        (sender, token_account)
    }

    pub fn owner_accounts(&self) -> OwnerAccounts {
        OwnerAccounts {
            owner: Caller::signer(self.owner),
            mint: self.mint,
            owner_token_account: self.ledger.account(&self.owner_token_account),
            vault: self.addresses.vault,
            vault_authority: self.addresses.vault_authority,
            vault_token_account: self.ledger.account(&self.addresses.vault_token_account),
        }
    }

    pub fn interest_accounts(&self, sender: Pubkey, sender_token_account: Pubkey) -> InterestAccounts {
        InterestAccounts {
            sender: Caller::signer(sender),
            sender_token_account: self.ledger.account(&sender_token_account),
            mint: self.mint,
            vault: self.addresses.vault,
            vault_authority: self.addresses.vault_authority,
            vault_token_account: self.ledger.account(&self.addresses.vault_token_account),
        }
    }

    pub fn initialize(&mut self, seed_amount: u64) -> Result<()> {
        let accounts = self.owner_accounts();
        self.initialize_with(&accounts, seed_amount)
    }

    pub fn initialize_with(&mut self, accounts: &OwnerAccounts, seed_amount: u64) -> Result<()> {
        Custody::new(&self.program_id, &RuntimeDeriver).initialize(
            &mut self.record,
            accounts,
            seed_amount,
            &mut self.ledger,
        )
    }

    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        let accounts = self.owner_accounts();
        self.deposit_with(&accounts, amount)
    }

    pub fn deposit_with(&mut self, accounts: &OwnerAccounts, amount: u64) -> Result<()> {
        Custody::new(&self.program_id, &RuntimeDeriver).deposit(
            &mut self.record,
            accounts,
            amount,
            &mut self.ledger,
        )
    }

    pub fn withdraw(&mut self, amount: u64) -> Result<()> {
        let accounts = self.owner_accounts();
        self.withdraw_with(&accounts, amount)
    }

    pub fn withdraw_with(&mut self, accounts: &OwnerAccounts, amount: u64) -> Result<()> {
        Custody::new(&self.program_id, &RuntimeDeriver).withdraw(
            &mut self.record,
            accounts,
            amount,
            &mut self.ledger,
        )
    }

    pub fn send_interest(&mut self, sender: Pubkey, sender_token_account: Pubkey) -> Result<u64> {
        let accounts = self.interest_accounts(sender, sender_token_account);
        self.send_interest_with(&accounts)
    }

    pub fn send_interest_with(&mut self, accounts: &InterestAccounts) -> Result<u64> {
        Custody::new(&self.program_id, &RuntimeDeriver).contribute_interest(
            &mut self.record,
            accounts,
            &mut self.ledger,
        )
    }

    pub fn vault_balance(&self) -> u64 {
        self.ledger.balance(&self.addresses.vault_token_account)
    }

    /// The custody ledger and the accounting fields must agree exactly.
    pub fn assert_books_balance(&self) {
        assert_eq!(
            Some(self.vault_balance()),
            self.record.custodied_balance(),
            "vault token balance diverged from the record: {:?}",
            self.record
        );
    }
}

pub fn assert_vault_error<T: std::fmt::Debug>(result: Result<T>, expected: VaultError) {
    let expected: anchor_lang::error::Error = expected.into();
    assert_eq!(result.unwrap_err(), expected);
}
