use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::custody::{Caller, Custody, OwnerAccounts};
use crate::derivation::{RuntimeDeriver, TOKENS_SEED, VAULT_SEED};
use crate::events::VaultInitialized;
use crate::state::Vault;
use crate::token::{SplTokenProgram, TokenAccountState};

/// Create the vault record and its token account, then move the seed amount in.
///
/// The record is created with `init_if_needed` so that a second call reaches
/// the handler and fails with `AlreadyInitialized` on the `initialized` flag
/// instead of an opaque "account in use" from the system program.
pub fn initialize_vault(ctx: Context<InitializeVault>, seed_amount: u64) -> Result<()> {
    msg!("Initializing vault with {} tokens", seed_amount);

    let accounts = ctx.accounts.owner_accounts();
    let mut token_program = ctx.accounts.transfer_program();
    let custody = Custody::new(ctx.program_id, &RuntimeDeriver);
    custody.initialize(&mut ctx.accounts.vault, &accounts, seed_amount, &mut token_program)?;

    emit!(VaultInitialized {
        vault: ctx.accounts.vault.key(),
        owner: ctx.accounts.owner.key(),
        mint: ctx.accounts.mint.key(),
        seed_amount,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(constraint = mint.is_initialized)]
    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub owner_token_account: Account<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = owner,
        space = Vault::LEN,
        seeds = [VAULT_SEED, owner.key().as_ref(), mint.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    /// CHECK: Never read. Compared against [b"authority", vault] by the handler
    /// and only ever used as a PDA signer.
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        token::mint = mint,
        token::authority = vault_authority,
        seeds = [TOKENS_SEED, vault.key().as_ref()],
        bump
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitializeVault<'info> {
    fn owner_accounts(&self) -> OwnerAccounts {
        OwnerAccounts {
            owner: Caller {
                key: self.owner.key(),
                is_signer: self.owner.is_signer,
            },
            mint: self.mint.key(),
            owner_token_account: TokenAccountState::of(&self.owner_token_account),
            vault: self.vault.key(),
            vault_authority: self.vault_authority.key(),
            vault_token_account: TokenAccountState::of(&self.vault_token_account),
        }
    }

    fn transfer_program(&self) -> SplTokenProgram<'info> {
        SplTokenProgram::new(
            self.token_program.to_account_info(),
            vec![
                self.owner.to_account_info(),
                self.owner_token_account.to_account_info(),
                self.vault_token_account.to_account_info(),
            ],
        )
    }
}
