use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::derivation::AUTHORITY_SEED;
use crate::errors::VaultError;

/// Snapshot of an SPL token account as the handlers see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountState {
    pub address: Pubkey,
    pub mint: Pubkey,
    /// Holder allowed to move the balance (the SPL `owner` field)
    pub owner: Pubkey,
    pub amount: u64,
}

impl TokenAccountState {
    pub fn of(account: &Account<'_, TokenAccount>) -> Self {
        Self {
            address: account.key(),
            mint: account.mint,
            owner: account.owner,
            amount: account.amount,
        }
    }

    pub fn require_held_by(&self, mint: &Pubkey, holder: &Pubkey) -> Result<()> {
        if &self.mint != mint || &self.owner != holder {
            msg!(
                "Token account {} has mint {} and holder {}, expected {} / {}",
                self.address,
                self.mint,
                self.owner,
                mint,
                holder
            );
            return err!(VaultError::InvalidTokenAccount);
        }
        Ok(())
    }
}

/// Who authorizes a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferAuthority {
    /// A transaction signer (owner or interest sender).
    Signer(Pubkey),
    /// The vault authority PDA, signed by this program with
    /// seeds [b"authority", vault, bump].
    VaultAuthority {
        address: Pubkey,
        vault: Pubkey,
        bump: u8,
    },
}

impl TransferAuthority {
    pub fn key(&self) -> Pubkey {
        match self {
            TransferAuthority::Signer(key) => *key,
            TransferAuthority::VaultAuthority { address, .. } => *address,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: Pubkey,
    pub destination: Pubkey,
    pub authority: TransferAuthority,
    pub amount: u64,
}

/// Balance-conserving token transfer primitive.
pub trait TokenTransfer {
    fn transfer(&mut self, request: &TransferRequest) -> Result<()>;
}

/// [`TokenTransfer`] backed by a CPI into the SPL Token program.
///
/// Holds every account the instruction may move tokens between; the request
/// picks source, destination and authority out of them by key.
pub struct SplTokenProgram<'info> {
    program: AccountInfo<'info>,
    accounts: Vec<AccountInfo<'info>>,
}

impl<'info> SplTokenProgram<'info> {
    pub fn new(program: AccountInfo<'info>, accounts: Vec<AccountInfo<'info>>) -> Self {
        Self { program, accounts }
    }

    fn account(&self, key: &Pubkey) -> Result<AccountInfo<'info>> {
        self.accounts
            .iter()
            .find(|info| info.key == key)
            .cloned()
            .ok_or_else(|| error!(anchor_lang::error::ErrorCode::AccountNotEnoughKeys))
    }
}

impl<'info> TokenTransfer for SplTokenProgram<'info> {
    fn transfer(&mut self, request: &TransferRequest) -> Result<()> {
        let cpi_accounts = Transfer {
            from: self.account(&request.source)?,
            to: self.account(&request.destination)?,
            authority: self.account(&request.authority.key())?,
        };
        let cpi_program = self.program.clone();

        match &request.authority {
            TransferAuthority::Signer(_) => {
                token::transfer(CpiContext::new(cpi_program, cpi_accounts), request.amount)
            }
            TransferAuthority::VaultAuthority { vault, bump, .. } => {
                let bump = [*bump];
                let seeds: &[&[u8]] = &[AUTHORITY_SEED, vault.as_ref(), &bump];
                let signer = &[seeds];
                token::transfer(
                    CpiContext::new_with_signer(cpi_program, cpi_accounts, signer),
                    request.amount,
                )
            }
        }
    }
}
