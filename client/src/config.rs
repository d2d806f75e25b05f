use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_KEYPAIR_PATH: &str = "~/.config/solana/id.json";

pub const RPC_URL_VAR: &str = "VAULT_RPC_URL";
pub const KEYPAIR_VAR: &str = "VAULT_KEYPAIR";
pub const PROGRAM_ID_VAR: &str = "VAULT_PROGRAM_ID";

/// Where to reach the cluster, who signs, and which deployment to talk to.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub rpc_url: String,
    /// May start with `~`; expanded when the keypair is loaded.
    pub keypair_path: String,
    pub program_id: Pubkey,
    pub commitment: CommitmentConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            keypair_path: DEFAULT_KEYPAIR_PATH.to_string(),
            program_id: vault::ID,
            commitment: CommitmentConfig::confirmed(),
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by whichever `VAULT_*` variables are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(rpc_url) = lookup(RPC_URL_VAR) {
            config.rpc_url = rpc_url;
        }
        if let Some(keypair_path) = lookup(KEYPAIR_VAR) {
            config.keypair_path = keypair_path;
        }
        if let Some(program_id) = lookup(PROGRAM_ID_VAR) {
            config.program_id = Pubkey::from_str(program_id.trim())
                .with_context(|| format!("{PROGRAM_ID_VAR} is not a valid pubkey: {program_id}"))?;
        }
        Ok(config)
    }

    pub fn expanded_keypair_path(&self) -> String {
        shellexpand::tilde(&self.keypair_path).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_devnet_and_the_deployed_program() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.program_id, vault::ID);
        assert_eq!(config.commitment, CommitmentConfig::confirmed());
    }

    #[test]
    fn env_overrides_each_field_independently() {
        let program_id = Pubkey::new_unique();
        let config = ClientConfig::from_lookup(lookup(&[
            (RPC_URL_VAR, "http://127.0.0.1:8899"),
            (PROGRAM_ID_VAR, &program_id.to_string()),
        ]))
        .unwrap();

        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.program_id, program_id);
        assert_eq!(config.keypair_path, DEFAULT_KEYPAIR_PATH);
    }

    #[test]
    fn malformed_program_id_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[(PROGRAM_ID_VAR, "not-a-key")])).unwrap_err();

        assert!(err.to_string().contains(PROGRAM_ID_VAR));
    }

    #[test]
    fn absolute_keypair_path_is_left_alone() {
        let config = ClientConfig {
            keypair_path: "/etc/keys/payer.json".to_string(),
            ..ClientConfig::default()
        };

        assert_eq!(config.expanded_keypair_path(), "/etc/keys/payer.json");
    }
}
