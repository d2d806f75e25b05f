use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Vault is already initialized")]
    AlreadyInitialized,

    #[msg("Vault is not initialized")]
    NotInitialized,

    #[msg("Supplied account does not match the derived vault address")]
    AddressDerivationMismatch,

    #[msg("Withdraw amount exceeds the tokens held by the vault")]
    InsufficientCustodiedBalance,

    #[msg("Caller token account balance is too low for this transfer")]
    InsufficientCallerBalance,

    #[msg("Missing or wrong signer for this vault")]
    Unauthorized,

    #[msg("Amount must be greater than 0")]
    InvalidAmount,

    #[msg("Token account has the wrong mint or holder")]
    InvalidTokenAccount,

    #[msg("Arithmetic overflow")]
    Overflow,
}
