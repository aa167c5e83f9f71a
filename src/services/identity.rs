use async_trait::async_trait;
use starknet_core::types::Felt;

use super::onchain::{parse_felt, resolve_wallet_account};
use crate::config::Config;
use crate::error::{ClientError, Result};

/// The boundary over wallet/session bootstrap: whatever provides the
/// currently selected account. May fail when no identity is available.
#[async_trait]
pub trait IdentityProvider {
    async fn selected_address(&self) -> Result<Felt>;
}

/// Identity backed by the configured wallet keys.
#[derive(Debug)]
pub struct WalletIdentity {
    address: Felt,
}

impl WalletIdentity {
    pub fn from_config(config: &Config) -> Result<Self> {
        let raw = resolve_wallet_account(config).ok_or_else(|| {
            ClientError::IdentityUnavailable("No wallet account configured".to_string())
        })?;
        let address = parse_felt(raw)
            .map_err(|e| ClientError::IdentityUnavailable(e.to_string()))?;
        if address == Felt::ZERO {
            return Err(ClientError::IdentityUnavailable(
                "Wallet account resolves to the zero address".to_string(),
            ));
        }
        Ok(Self { address })
    }
}

#[async_trait]
impl IdentityProvider for WalletIdentity {
    async fn selected_address(&self) -> Result<Felt> {
        Ok(self.address)
    }
}
