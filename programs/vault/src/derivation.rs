use anchor_lang::prelude::*;

use crate::errors::VaultError;
use crate::state::VaultBumps;

pub const VAULT_SEED: &[u8] = b"vault";
pub const AUTHORITY_SEED: &[u8] = b"authority";
pub const TOKENS_SEED: &[u8] = b"tokens";

/// Program-derived address primitive.
///
/// The runtime implementation is [`RuntimeDeriver`]; tests may swap in their
/// own to exercise derivation edge cases.
pub trait AddressDeriver {
    /// Canonical search: highest bump that yields an off-curve address.
    fn find_program_address(&self, seeds: &[&[u8]], program_id: &Pubkey) -> (Pubkey, u8);

    /// Seeds already include the bump. `None` if the result is on-curve.
    fn create_program_address(&self, seeds: &[&[u8]], program_id: &Pubkey) -> Option<Pubkey>;
}

pub struct RuntimeDeriver;

impl AddressDeriver for RuntimeDeriver {
    fn find_program_address(&self, seeds: &[&[u8]], program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(seeds, program_id)
    }

    fn create_program_address(&self, seeds: &[&[u8]], program_id: &Pubkey) -> Option<Pubkey> {
        Pubkey::create_program_address(seeds, program_id).ok()
    }
}

/// The three PDAs that make up a vault, plus the bumps that produced them.
///
/// Seeds:
/// - vault:               [b"vault", owner, mint]
/// - vault_authority:     [b"authority", vault]
/// - vault_token_account: [b"tokens", vault]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultAddresses {
    pub vault: Pubkey,
    pub vault_authority: Pubkey,
    pub vault_token_account: Pubkey,
    pub bumps: VaultBumps,
}

impl VaultAddresses {
    /// Canonical derivation. This is what clients call to address a vault.
    pub fn find<D: AddressDeriver>(
        owner: &Pubkey,
        mint: &Pubkey,
        program_id: &Pubkey,
        deriver: &D,
    ) -> Self {
        let (vault, vault_bump) =
            deriver.find_program_address(&[VAULT_SEED, owner.as_ref(), mint.as_ref()], program_id);
        let (vault_authority, authority_bump) =
            deriver.find_program_address(&[AUTHORITY_SEED, vault.as_ref()], program_id);
        let (vault_token_account, tokens_bump) =
            deriver.find_program_address(&[TOKENS_SEED, vault.as_ref()], program_id);

        Self {
            vault,
            vault_authority,
            vault_token_account,
            bumps: VaultBumps {
                vault: vault_bump,
                vault_authority: authority_bump,
                vault_token_account: tokens_bump,
            },
        }
    }

    /// Rebuild the addresses from bumps stored in a vault record, without
    /// searching. Returns `None` if any stored bump no longer derives an
    /// off-curve address.
    pub fn from_bumps<D: AddressDeriver>(
        owner: &Pubkey,
        mint: &Pubkey,
        bumps: VaultBumps,
        program_id: &Pubkey,
        deriver: &D,
    ) -> Option<Self> {
        let vault = deriver.create_program_address(
            &[VAULT_SEED, owner.as_ref(), mint.as_ref(), &[bumps.vault]],
            program_id,
        )?;
        let vault_authority = deriver.create_program_address(
            &[AUTHORITY_SEED, vault.as_ref(), &[bumps.vault_authority]],
            program_id,
        )?;
        let vault_token_account = deriver.create_program_address(
            &[TOKENS_SEED, vault.as_ref(), &[bumps.vault_token_account]],
            program_id,
        )?;

        Some(Self {
            vault,
            vault_authority,
            vault_token_account,
            bumps,
        })
    }

    /// Compare caller-supplied addresses against this derivation.
    pub fn verify(
        &self,
        vault: &Pubkey,
        vault_authority: &Pubkey,
        vault_token_account: &Pubkey,
    ) -> Result<()> {
        if vault != &self.vault {
            msg!("Vault mismatch: expected {}, got {}", self.vault, vault);
            return err!(VaultError::AddressDerivationMismatch);
        }
        if vault_authority != &self.vault_authority {
            msg!(
                "Vault authority mismatch: expected {}, got {}",
                self.vault_authority,
                vault_authority
            );
            return err!(VaultError::AddressDerivationMismatch);
        }
        if vault_token_account != &self.vault_token_account {
            msg!(
                "Vault token account mismatch: expected {}, got {}",
                self.vault_token_account,
                vault_token_account
            );
            return err!(VaultError::AddressDerivationMismatch);
        }
        Ok(())
    }
}

/// Canonical addresses of the vault for (owner, mint) under this program.
pub fn vault_addresses(owner: &Pubkey, mint: &Pubkey) -> VaultAddresses {
    VaultAddresses::find(owner, mint, &crate::ID, &RuntimeDeriver)
}
