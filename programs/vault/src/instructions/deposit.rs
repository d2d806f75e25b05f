use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::custody::{Caller, Custody, OwnerAccounts};
use crate::derivation::RuntimeDeriver;
use crate::events::Deposited;
use crate::state::Vault;
use crate::token::{SplTokenProgram, TokenAccountState};

/// Move `amount` from the owner's token account into the vault.
pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    msg!("Depositing {} tokens", amount);

    let accounts = ctx.accounts.owner_accounts();
    let mut token_program = ctx.accounts.transfer_program();
    let custody = Custody::new(ctx.program_id, &RuntimeDeriver);
    custody.deposit(&mut ctx.accounts.vault, &accounts, amount, &mut token_program)?;

    emit!(Deposited {
        vault: ctx.accounts.vault.key(),
        owner: ctx.accounts.owner.key(),
        amount,
        deposited_amount: ctx.accounts.vault.deposited_amount,
    });
    Ok(())
}

/// Vault PDAs are not constrained here: the handler re-derives them from
/// the bumps stored on the record and rejects any mismatch.
#[derive(Accounts)]
pub struct Deposit<'info> {
    pub owner: Signer<'info>,

    #[account(constraint = mint.is_initialized)]
    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub owner_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    /// CHECK: Address verified against the stored authority bump by the handler.
    pub vault_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Deposit<'info> {
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
