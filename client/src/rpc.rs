use anchor_lang::{AccountDeserialize, Discriminator};
use anyhow::{anyhow, Context, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use spl_associated_token_account::get_associated_token_address;
use vault::Vault;

use crate::config::ClientConfig;
use crate::instructions;

/// Talks to one deployment of the vault program, signing as one keypair.
///
/// Token accounts default to the signer's associated token account for the
/// vault mint.
pub struct VaultClient {
    rpc: RpcClient,
    payer: Keypair,
    program_id: Pubkey,
}

impl VaultClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let keypair_path = config.expanded_keypair_path();
        let payer = read_keypair_file(&keypair_path)
            .map_err(|e| anyhow!("failed to read keypair {keypair_path}: {e}"))?;
        Ok(Self::with_payer(config, payer))
    }

    pub fn with_payer(config: &ClientConfig, payer: Keypair) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(config.rpc_url.clone(), config.commitment),
            payer,
            program_id: config.program_id,
        }
    }

    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn token_account(&self, mint: &Pubkey) -> Pubkey {
        get_associated_token_address(&self.payer(), mint)
    }

    pub async fn initialize_vault(&self, mint: &Pubkey, seed_amount: u64) -> Result<Signature> {
        let owner = self.payer();
        let ix = instructions::initialize_vault(
            &self.program_id,
            &owner,
            mint,
            &self.token_account(mint),
            seed_amount,
        );
        self.send(ix).await.context("initialize_vault failed")
    }

    pub async fn deposit(&self, mint: &Pubkey, amount: u64) -> Result<Signature> {
        let owner = self.payer();
        let ix = instructions::deposit(&self.program_id, &owner, mint, &self.token_account(mint), amount);
        self.send(ix).await.context("deposit failed")
    }

    pub async fn withdraw(&self, mint: &Pubkey, amount: u64) -> Result<Signature> {
        let owner = self.payer();
        let ix = instructions::withdraw(&self.program_id, &owner, mint, &self.token_account(mint), amount);
        self.send(ix).await.context("withdraw failed")
    }

    /// Pay interest into the vault of (`owner`, `mint`) from the signer's
    /// associated token account.
    pub async fn send_interest(&self, owner: &Pubkey, mint: &Pubkey) -> Result<Signature> {
        let sender = self.payer();
        let ix = instructions::send_interest(
            &self.program_id,
            &sender,
            &self.token_account(mint),
            owner,
            mint,
        );
        self.send(ix).await.context("send_interest failed")
    }

    pub async fn fetch_vault(&self, address: &Pubkey) -> Result<Vault> {
        let data = self
            .rpc
            .get_account_data(address)
            .await
            .with_context(|| format!("failed to fetch vault {address}"))?;
        decode_vault(&data).with_context(|| format!("account {address} is not a vault"))
    }

    /// Every vault record owned by the program. Accounts that fail to decode
    /// are skipped.
    pub async fn list_vaults(&self) -> Result<Vec<(Pubkey, Vault)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vault_filters()),
            account_config: RpcAccountInfoConfig {
                commitment: Some(self.rpc.commitment()),
                ..Default::default()
            },
            ..Default::default()
        };
        let accounts = self
            .rpc
            .get_program_accounts_with_config(&self.program_id, config)
            .await
            .context("failed to list vault accounts")?;

        let mut vaults = Vec::with_capacity(accounts.len());
        for (address, account) in accounts {
            match decode_vault(&account.data) {
                Ok(record) => vaults.push((address, record)),
                Err(e) => eprintln!("skipping {address}: {e:#}"),
            }
        }
        Ok(vaults)
    }

    async fn send(&self, ix: Instruction) -> Result<Signature> {
        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .context("failed to fetch latest blockhash")?;
        let tx = Transaction::new_signed_with_payer(
            &[ix],
            Some(&self.payer.pubkey()),
            &[&self.payer],
            blockhash,
        );
        Ok(self.rpc.send_and_confirm_transaction(&tx).await?)
    }
}

/// Vault accounts are exactly `Vault::LEN` bytes and start with its discriminator.
pub fn vault_filters() -> Vec<RpcFilterType> {
    vec![
        RpcFilterType::DataSize(Vault::LEN as u64),
        RpcFilterType::Memcmp(Memcmp::new_raw_bytes(0, Vault::DISCRIMINATOR.to_vec())),
    ]
}

pub fn decode_vault(data: &[u8]) -> Result<Vault> {
    let mut data = data;
    Vault::try_deserialize(&mut data).map_err(|e| anyhow!("{e}"))
}
