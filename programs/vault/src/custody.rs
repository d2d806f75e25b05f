//! Vault state transitions.
//!
//! Every transition validates all of its inputs first, then performs at most
//! one token transfer, then writes the record. A failed check therefore never
//! leaves a transfer or a partial record update behind.

use anchor_lang::prelude::*;

use crate::derivation::{AddressDeriver, VaultAddresses};
use crate::errors::VaultError;
use crate::state::Vault;
use crate::token::{TokenAccountState, TokenTransfer, TransferAuthority, TransferRequest};

/// A transaction account together with its signature flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller {
    pub key: Pubkey,
    pub is_signer: bool,
}

impl Caller {
    pub fn signer(key: Pubkey) -> Self {
        Self {
            key,
            is_signer: true,
        }
    }

    fn require_signed(&self) -> Result<()> {
        if !self.is_signer {
            msg!("{} did not sign the transaction", self.key);
            return err!(VaultError::Unauthorized);
        }
        Ok(())
    }
}

/// Accounts for the owner-signed instructions: initialize, deposit, withdraw.
#[derive(Clone, Copy, Debug)]
pub struct OwnerAccounts {
    pub owner: Caller,
    pub mint: Pubkey,
    pub owner_token_account: TokenAccountState,
    pub vault: Pubkey,
    pub vault_authority: Pubkey,
    pub vault_token_account: TokenAccountState,
}

/// Accounts for an interest contribution. The sender can be anyone.
#[derive(Clone, Copy, Debug)]
pub struct InterestAccounts {
    pub sender: Caller,
    pub sender_token_account: TokenAccountState,
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub vault_authority: Pubkey,
    pub vault_token_account: TokenAccountState,
}

pub struct Custody<'a, D: AddressDeriver> {
    program_id: &'a Pubkey,
    deriver: &'a D,
}

impl<'a, D: AddressDeriver> Custody<'a, D> {
    pub fn new(program_id: &'a Pubkey, deriver: &'a D) -> Self {
        Self {
            program_id,
            deriver,
        }
    }

    /// Uninitialized -> Active. Moves `seed_amount` from the owner into the
    /// vault when it is non-zero.
    pub fn initialize<T: TokenTransfer>(
        &self,
        record: &mut Vault,
        accounts: &OwnerAccounts,
        seed_amount: u64,
        token: &mut T,
    ) -> Result<()> {
        accounts.owner.require_signed()?;

        let addresses = VaultAddresses::find(
            &accounts.owner.key,
            &accounts.mint,
            self.program_id,
            self.deriver,
        );
        addresses.verify(
            &accounts.vault,
            &accounts.vault_authority,
            &accounts.vault_token_account.address,
        )?;

        require!(!record.initialized, VaultError::AlreadyInitialized);

        accounts
            .owner_token_account
            .require_held_by(&accounts.mint, &accounts.owner.key)?;
        accounts
            .vault_token_account
            .require_held_by(&accounts.mint, &addresses.vault_authority)?;

        if seed_amount > 0 {
            require_balance(&accounts.owner_token_account, seed_amount)?;
            token.transfer(&TransferRequest {
                source: accounts.owner_token_account.address,
                destination: addresses.vault_token_account,
                authority: TransferAuthority::Signer(accounts.owner.key),
                amount: seed_amount,
            })?;
        }

        *record = Vault {
            deposited_amount: seed_amount,
            withdrawn_amount: 0,
            interest_earned: 0,
            initialized: true,
            owner: accounts.owner.key,
            mint: accounts.mint,
            bumps: addresses.bumps,
        };

        msg!(
            "Vault {} initialized for owner {} with {} tokens",
            addresses.vault,
            record.owner,
            seed_amount
        );
        Ok(())
    }

    pub fn deposit<T: TokenTransfer>(
        &self,
        record: &mut Vault,
        accounts: &OwnerAccounts,
        amount: u64,
        token: &mut T,
    ) -> Result<()> {
        let addresses = self.check_owner_accounts(record, accounts)?;
        require!(amount > 0, VaultError::InvalidAmount);

        let deposited_amount = record
            .deposited_amount
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        require_balance(&accounts.owner_token_account, amount)?;

        token.transfer(&TransferRequest {
            source: accounts.owner_token_account.address,
            destination: addresses.vault_token_account,
            authority: TransferAuthority::Signer(accounts.owner.key),
            amount,
        })?;

        record.deposited_amount = deposited_amount;
        msg!("Deposited {} into vault {}", amount, addresses.vault);
        Ok(())
    }

    /// Pays out to the owner. The vault authority PDA signs the transfer;
    /// the owner's signature only expresses intent.
    pub fn withdraw<T: TokenTransfer>(
        &self,
        record: &mut Vault,
        accounts: &OwnerAccounts,
        amount: u64,
        token: &mut T,
    ) -> Result<()> {
        let addresses = self.check_owner_accounts(record, accounts)?;
        require!(amount > 0, VaultError::InvalidAmount);

        let custodied = record
            .custodied_balance()
            .ok_or(VaultError::InsufficientCustodiedBalance)?;
        if amount > custodied || amount > accounts.vault_token_account.amount {
            msg!(
                "Cannot withdraw {}: vault holds {} (account balance {})",
                amount,
                custodied,
                accounts.vault_token_account.amount
            );
            return err!(VaultError::InsufficientCustodiedBalance);
        }
        let withdrawn_amount = record
            .withdrawn_amount
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;

        token.transfer(&TransferRequest {
            source: addresses.vault_token_account,
            destination: accounts.owner_token_account.address,
            authority: TransferAuthority::VaultAuthority {
                address: addresses.vault_authority,
                vault: addresses.vault,
                bump: record.bumps.vault_authority,
            },
            amount,
        })?;

        record.withdrawn_amount = withdrawn_amount;
        msg!("Withdrew {} from vault {}", amount, addresses.vault);
        Ok(())
    }

    /// Any signer tops the vault up by 1% of `deposited_amount`.
    ///
    /// Returns the amount credited. A vault with less than 100 tokens
    /// deposited earns nothing; that is a successful no-op without a transfer.
    pub fn contribute_interest<T: TokenTransfer>(
        &self,
        record: &mut Vault,
        accounts: &InterestAccounts,
        token: &mut T,
    ) -> Result<u64> {
        require!(record.initialized, VaultError::NotInitialized);
        accounts.sender.require_signed()?;

        let addresses = self.stored_addresses(record, &accounts.mint)?;
        addresses.verify(
            &accounts.vault,
            &accounts.vault_authority,
            &accounts.vault_token_account.address,
        )?;

        accounts
            .sender_token_account
            .require_held_by(&record.mint, &accounts.sender.key)?;
        accounts
            .vault_token_account
            .require_held_by(&record.mint, &addresses.vault_authority)?;

        let interest = record.interest_due();
        if interest == 0 {
            msg!("Vault {} has no interest due", addresses.vault);
            return Ok(0);
        }

        require_balance(&accounts.sender_token_account, interest)?;
        let interest_earned = record
            .interest_earned
            .checked_add(interest)
            .ok_or(VaultError::Overflow)?;

        token.transfer(&TransferRequest {
            source: accounts.sender_token_account.address,
            destination: addresses.vault_token_account,
            authority: TransferAuthority::Signer(accounts.sender.key),
            amount: interest,
        })?;

        record.interest_earned = interest_earned;
        msg!(
            "{} sent {} interest to vault {}",
            accounts.sender.key,
            interest,
            addresses.vault
        );
        Ok(interest)
    }

    /// Shared checks for deposit and withdraw, in order: initialized, owner
    /// signature, derived addresses, token account holders.
    fn check_owner_accounts(
        &self,
        record: &Vault,
        accounts: &OwnerAccounts,
    ) -> Result<VaultAddresses> {
        require!(record.initialized, VaultError::NotInitialized);
        accounts.owner.require_signed()?;
        if accounts.owner.key != record.owner {
            msg!(
                "Signer {} is not the vault owner {}",
                accounts.owner.key,
                record.owner
            );
            return err!(VaultError::Unauthorized);
        }

        let addresses = self.stored_addresses(record, &accounts.mint)?;
        addresses.verify(
            &accounts.vault,
            &accounts.vault_authority,
            &accounts.vault_token_account.address,
        )?;

        accounts
            .owner_token_account
            .require_held_by(&record.mint, &record.owner)?;
        accounts
            .vault_token_account
            .require_held_by(&record.mint, &addresses.vault_authority)?;

        Ok(addresses)
    }

    /// Addresses rebuilt from the record's stored bumps. A supplied mint
    /// other than the record's would address a different vault.
    fn stored_addresses(&self, record: &Vault, mint: &Pubkey) -> Result<VaultAddresses> {
        if mint != &record.mint {
            msg!("Mint {} does not belong to this vault ({})", mint, record.mint);
            return err!(VaultError::AddressDerivationMismatch);
        }
        VaultAddresses::from_bumps(
            &record.owner,
            &record.mint,
            record.bumps,
            self.program_id,
            self.deriver,
        )
        .ok_or_else(|| error!(VaultError::AddressDerivationMismatch))
    }
}

fn require_balance(account: &TokenAccountState, amount: u64) -> Result<()> {
    if account.amount < amount {
        msg!(
            "Token account {} holds {}, needs {}",
            account.address,
            account.amount,
            amount
        );
        return err!(VaultError::InsufficientCallerBalance);
    }
    Ok(())
}
