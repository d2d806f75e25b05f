use anchor_lang::prelude::*;

declare_id!("DpLHaRUPhCru3F8f3Aa1V8xHAxKmb9cdEqFD3E9BHRXv");

pub mod custody;
pub mod derivation;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod token;

pub use errors::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

#[cfg(test)]
mod tests;

#[program]
pub mod vault {
    use super::*;

    /// Create the vault for (owner, mint) and move `seed_amount` into it.
    /// Fails with `AlreadyInitialized` if the vault already exists.
    pub fn initialize_vault(ctx: Context<InitializeVault>, seed_amount: u64) -> Result<()> {
        instructions::initialize_vault(ctx, seed_amount)
    }

    /// Owner-only deposit
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit(ctx, amount)
    }

    /// Owner-only withdrawal, signed on-chain by the vault authority PDA
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw(ctx, amount)
    }

    /// Anyone may pay 1% of the deposited amount into the vault as interest
    pub fn send_interest(ctx: Context<SendInterest>) -> Result<()> {
        instructions::send_interest(ctx)
    }
}
