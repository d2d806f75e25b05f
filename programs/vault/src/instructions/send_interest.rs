use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::custody::{Caller, Custody, InterestAccounts};
use crate::derivation::RuntimeDeriver;
use crate::events::InterestSent;
use crate::state::Vault;
use crate::token::{SplTokenProgram, TokenAccountState};

/// Permissionless top-up: the sender pays 1% of the vault's deposited amount
/// into the vault token account. Only the owner can ever withdraw it.
pub fn send_interest(ctx: Context<SendInterest>) -> Result<()> {
    let accounts = ctx.accounts.interest_accounts();
    let mut token_program = ctx.accounts.transfer_program();
    let custody = Custody::new(ctx.program_id, &RuntimeDeriver);
    let amount = custody.contribute_interest(&mut ctx.accounts.vault, &accounts, &mut token_program)?;

    if amount > 0 {
        emit!(InterestSent {
            vault: ctx.accounts.vault.key(),
            sender: ctx.accounts.sender.key(),
            amount,
            interest_earned: ctx.accounts.vault.interest_earned,
        });
    }
    Ok(())
}

#[derive(Accounts)]
pub struct SendInterest<'info> {
    pub sender: Signer<'info>,

    #[account(mut)]
    pub sender_token_account: Account<'info, TokenAccount>,

    #[account(constraint = mint.is_initialized)]
    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    /// CHECK: Address verified against the stored authority bump by the handler.
    pub vault_authority: UncheckedAccount<'info>,

    #[account(mut)]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> SendInterest<'info> {
    fn interest_accounts(&self) -> InterestAccounts {
        InterestAccounts {
            sender: Caller {
                key: self.sender.key(),
                is_signer: self.sender.is_signer,
            },
            sender_token_account: TokenAccountState::of(&self.sender_token_account),
            mint: self.mint.key(),
            vault: self.vault.key(),
            vault_authority: self.vault_authority.key(),
            vault_token_account: TokenAccountState::of(&self.vault_token_account),
        }
    }

    fn transfer_program(&self) -> SplTokenProgram<'info> {
        SplTokenProgram::new(
            self.token_program.to_account_info(),
            vec![
                self.sender.to_account_info(),
                self.sender_token_account.to_account_info(),
                self.vault_token_account.to_account_info(),
            ],
        )
    }
}
