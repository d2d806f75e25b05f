//! Transaction instructions for the vault program.
//!
//! Every vault address is derived client-side with the same seeds the
//! program checks, so callers only ever name an owner and a mint.

use anchor_lang::{system_program, InstructionData, ToAccountMetas};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use vault::derivation::{RuntimeDeriver, VaultAddresses};

pub fn derive_addresses(program_id: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> VaultAddresses {
    VaultAddresses::find(owner, mint, program_id, &RuntimeDeriver)
}

pub fn initialize_vault(
    program_id: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    owner_token_account: &Pubkey,
    seed_amount: u64,
) -> Instruction {
    let addresses = derive_addresses(program_id, owner, mint);
    Instruction {
        program_id: *program_id,
        accounts: vault::accounts::InitializeVault {
            owner: *owner,
            mint: *mint,
            owner_token_account: *owner_token_account,
            vault: addresses.vault,
            vault_authority: addresses.vault_authority,
            vault_token_account: addresses.vault_token_account,
            token_program: anchor_spl::token::ID,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: vault::instruction::InitializeVault { seed_amount }.data(),
    }
}

pub fn deposit(
    program_id: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    owner_token_account: &Pubkey,
    amount: u64,
) -> Instruction {
    let addresses = derive_addresses(program_id, owner, mint);
    Instruction {
        program_id: *program_id,
        accounts: vault::accounts::Deposit {
            owner: *owner,
            mint: *mint,
            owner_token_account: *owner_token_account,
            vault: addresses.vault,
            vault_authority: addresses.vault_authority,
            vault_token_account: addresses.vault_token_account,
            token_program: anchor_spl::token::ID,
        }
        .to_account_metas(None),
        data: vault::instruction::Deposit { amount }.data(),
    }
}

pub fn withdraw(
    program_id: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    owner_token_account: &Pubkey,
    amount: u64,
) -> Instruction {
    let addresses = derive_addresses(program_id, owner, mint);
    Instruction {
        program_id: *program_id,
        accounts: vault::accounts::Withdraw {
            owner: *owner,
            mint: *mint,
            owner_token_account: *owner_token_account,
            vault: addresses.vault,
            vault_authority: addresses.vault_authority,
            vault_token_account: addresses.vault_token_account,
            token_program: anchor_spl::token::ID,
        }
        .to_account_metas(None),
        data: vault::instruction::Withdraw { amount }.data(),
    }
}

/// Interest contribution from `sender` into the vault of (`owner`, `mint`).
pub fn send_interest(
    program_id: &Pubkey,
    sender: &Pubkey,
    sender_token_account: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    let addresses = derive_addresses(program_id, owner, mint);
    Instruction {
        program_id: *program_id,
        accounts: vault::accounts::SendInterest {
            sender: *sender,
            sender_token_account: *sender_token_account,
            mint: *mint,
            vault: addresses.vault,
            vault_authority: addresses.vault_authority,
            vault_token_account: addresses.vault_token_account,
            token_program: anchor_spl::token::ID,
        }
        .to_account_metas(None),
        data: vault::instruction::SendInterest {}.data(),
    }
}
