use anchor_lang::prelude::*;

#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub seed_amount: u64,
}

#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub deposited_amount: u64,
}

#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub withdrawn_amount: u64,
}

#[event]
pub struct InterestSent {
    pub vault: Pubkey,
    pub sender: Pubkey,
    pub amount: u64,
    pub interest_earned: u64,
}
