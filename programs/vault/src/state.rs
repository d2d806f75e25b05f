use anchor_lang::prelude::*;

/// Share of `deposited_amount` paid by each interest contribution, in percent.
pub const INTEREST_RATE_PERCENT: u64 = 1;

const _: () = assert!(INTEREST_RATE_PERCENT <= 100);

/// Canonical bumps of the three vault PDAs, written once at initialization.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VaultBumps {
    pub vault: u8,
    pub vault_authority: u8,
    pub vault_token_account: u8,
}

/// Accounting record for one (owner, mint) vault.
///
/// The tokens themselves live in the vault token account, which is owned by
/// the vault authority PDA. This record only tracks how they got there:
/// holding balance == deposited_amount + interest_earned - withdrawn_amount.
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Vault {
    /// Seed amount plus every deposit
    pub deposited_amount: u64,
    pub withdrawn_amount: u64,
    /// Sum of all interest contributions, from any sender
    pub interest_earned: u64,
    pub initialized: bool,
    /// Only this key may deposit or withdraw. Part of the vault PDA seeds.
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub bumps: VaultBumps,
}

impl Vault {
    pub const LEN: usize = 8 + // discriminator
        8 + // deposited_amount
        8 + // withdrawn_amount
        8 + // interest_earned
        1 + // initialized
        32 + // owner
        32 + // mint
        3; // bumps

    /// Tokens the vault still owes its owner.
    ///
    /// `None` means the accounting fields are inconsistent (more withdrawn
    /// than ever custodied) or overflowed.
    pub fn custodied_balance(&self) -> Option<u64> {
        self.deposited_amount
            .checked_add(self.interest_earned)?
            .checked_sub(self.withdrawn_amount)
    }

    /// Interest owed for a contribution made now: floor(deposited * rate / 100).
    pub fn interest_due(&self) -> u64 {
        let due = u128::from(self.deposited_amount) * u128::from(INTEREST_RATE_PERCENT) / 100;
        // INTEREST_RATE_PERCENT <= 100 keeps due <= deposited_amount
        due as u64
    }
}
