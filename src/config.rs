use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Environment
    pub environment: String,

    // Ledger
    pub rpc_url: String,
    pub chain_id: String,

    // Contract addresses
    pub game_contract_address: String,
    pub stake_token_address: String,

    // Wallet signing
    pub wallet_private_key: String,
    pub wallet_public_key: String,
    pub wallet_account_address: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            rpc_url: env::var("STARKNET_RPC_URL")?,
            chain_id: env::var("STARKNET_CHAIN_ID").unwrap_or_else(|_| "SN_MAIN".to_string()),

            game_contract_address: env::var("GAME_CONTRACT_ADDRESS")?,
            stake_token_address: env::var("STAKE_TOKEN_ADDRESS")?,

            wallet_private_key: env::var("WALLET_PRIVATE_KEY")?,
            wallet_public_key: env::var("WALLET_PUBLIC_KEY")?,
            wallet_account_address: env::var("WALLET_ACCOUNT_ADDRESS").ok(),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rpc_url.trim().is_empty() {
            anyhow::bail!("STARKNET_RPC_URL is empty");
        }
        if self.game_contract_address.trim().is_empty() {
            anyhow::bail!("GAME_CONTRACT_ADDRESS is empty");
        }
        if self.stake_token_address.trim().is_empty() {
            anyhow::bail!("STAKE_TOKEN_ADDRESS is empty");
        }
        if self.wallet_private_key.trim().is_empty() || self.wallet_public_key.trim().is_empty() {
            anyhow::bail!("Wallet signing keys are missing");
        }

        if self.game_contract_address.starts_with("0x0000") {
            tracing::warn!("Using placeholder game contract address");
        }
        if self.stake_token_address.starts_with("0x0000") {
            tracing::warn!("Using placeholder stake token address");
        }

        if self.wallet_private_key.contains("123456") {
            tracing::warn!("Detected dev credentials in config");
        }

        Ok(())
    }

    pub fn is_testnet(&self) -> bool {
        if self.environment == "development" || self.environment == "testnet" {
            return true;
        }
        let chain = self.chain_id.to_ascii_uppercase();
        chain.contains("SEPOLIA") || chain.contains("GOERLI")
    }
}
