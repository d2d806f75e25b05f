use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::custody::{Caller, Custody, OwnerAccounts};
use crate::derivation::RuntimeDeriver;
use crate::events::Withdrawn;
use crate::state::Vault;
use crate::token::{SplTokenProgram, TokenAccountState};

/// Release `amount` from the vault to the owner.
///
/// The owner signs to express intent; the transfer itself is signed by the
/// vault authority PDA, which is the only key able to move the vault's tokens.
pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    msg!("Withdrawing {} tokens", amount);

    let accounts = ctx.accounts.owner_accounts();
    let mut token_program = ctx.accounts.transfer_program();
    let custody = Custody::new(ctx.program_id, &RuntimeDeriver);
    custody.withdraw(&mut ctx.accounts.vault, &accounts, amount, &mut token_program)?;

    emit!(Withdrawn {
        vault: ctx.accounts.vault.key(),
        owner: ctx.accounts.owner.key(),
        amount,
        withdrawn_amount: ctx.accounts.vault.withdrawn_amount,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub owner: Signer<'info>,

    #[account(constraint = mint.is_initialized)]
    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub owner_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    /// CHECK: Address verified against the stored authority bump by the handler,
    /// then used as the PDA signer of the outgoing transfer.
    pub vault_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Withdraw<'info> {
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
                self.vault_authority.to_account_info(),
                self.vault_token_account.to_account_info(),
                self.owner_token_account.to_account_info(),
            ],
        )
    }
}
