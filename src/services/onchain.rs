use async_trait::async_trait;
use starknet_accounts::{Account, ExecutionEncoding, SingleOwnerAccount};
use starknet_core::types::{
    BlockId, BlockTag, Call, ContractClass, ExecutionResult, Felt, FunctionCall, StarknetError,
};
use starknet_core::utils::get_selector_from_name;
use starknet_providers::jsonrpc::{HttpTransport, JsonRpcClient};
use starknet_providers::{Provider, ProviderError};
use starknet_signers::{LocalWallet, SigningKey};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::time::sleep;
use url::Url;

use crate::config::Config;
use crate::constants::{
    ABI_CACHE_TTL_SECS, RECEIPT_POLL_INTERVAL_MS, REGISTRATION_FEE, REQUIRED_ENTRYPOINTS,
};
use crate::error::{ClientError, Result};
use crate::models::{Game, Move, Player};

/// The boundary over the external rule-enforcing contract. Everything the
/// session layer needs goes through this trait, so tests can swap the
/// ledger out.
#[async_trait]
pub trait LedgerGateway {
    async fn admin_address(&self) -> Result<Felt>;
    async fn player(&self, account: Felt) -> Result<Player>;
    async fn sender_games(&self, account: Felt) -> Result<Vec<Game>>;

    /// Register the calling wallet, attaching the fixed registration fee.
    async fn register(&self) -> Result<()>;
    async fn create_game(&self, stake: u128) -> Result<()>;
    /// Join an existing game, attaching its recorded stake as payment.
    async fn join_game(&self, game_id: u64, stake: u128) -> Result<()>;
    async fn make_move(&self, mv: Move) -> Result<()>;
}

/// Gateway to the checkers contract over Starknet JSON-RPC: view calls for
/// reads, a signing account for writes. Writes block until the ledger
/// reports the transaction settled.
pub struct CheckersContract {
    provider: JsonRpcClient<HttpTransport>,
    account: SingleOwnerAccount<JsonRpcClient<HttpTransport>, LocalWallet>,
    contract: Felt,
    stake_token: Felt,
    abi_checked: RwLock<Option<Instant>>,
}

impl CheckersContract {
    pub fn from_config(config: &Config) -> Result<Self> {
        let rpc_url = Url::parse(&config.rpc_url)
            .map_err(|e| ClientError::Config(format!("Invalid RPC URL: {}", e)))?;
        let provider = JsonRpcClient::new(HttpTransport::new(rpc_url.clone()));

        let private_key = parse_felt(&config.wallet_private_key)?;
        let signer = LocalWallet::from_signing_key(SigningKey::from_secret_scalar(private_key));

        let account_address = resolve_wallet_account(config).ok_or_else(|| {
            ClientError::Config("No wallet account address configured".to_string())
        })?;
        let account_address = parse_felt(account_address)?;
        let chain_id = parse_chain_id(&config.chain_id)?;

        let mut account = SingleOwnerAccount::new(
            JsonRpcClient::new(HttpTransport::new(rpc_url)),
            signer,
            account_address,
            chain_id,
            ExecutionEncoding::New,
        );
        // Some public RPC providers don't support "pre_confirmed" yet.
        // Force latest block tag for nonce/fee simulation compatibility.
        account.set_block_id(BlockId::Tag(BlockTag::Latest));

        Ok(Self {
            provider,
            account,
            contract: parse_felt(&config.game_contract_address)?,
            stake_token: parse_felt(&config.stake_token_address)?,
            abi_checked: RwLock::new(None),
        })
    }

    /// Verify the configured contract class exposes every required
    /// entrypoint. Cached with a TTL so repeated writes don't refetch the
    /// class.
    pub async fn ensure_abi(&self) -> Result<()> {
        {
            let checked = self.abi_checked.read().await;
            if let Some(at) = *checked {
                if at.elapsed() < Duration::from_secs(ABI_CACHE_TTL_SECS) {
                    return Ok(());
                }
            }
        }

        let class = self
            .provider
            .get_class_at(BlockId::Tag(BlockTag::Latest), self.contract)
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;

        let available = external_selectors_from_class(&class);
        let mut missing: Vec<&str> = Vec::new();
        for name in REQUIRED_ENTRYPOINTS {
            let selector = parse_selector(name)?;
            if !available.contains(&selector) {
                missing.push(name);
            }
        }

        if !missing.is_empty() {
            return Err(ClientError::Config(format!(
                "Configured GAME_CONTRACT_ADDRESS ({:#x}) is missing entrypoints: {}",
                self.contract,
                missing.join(", ")
            )));
        }

        *self.abi_checked.write().await = Some(Instant::now());
        Ok(())
    }

    async fn call(&self, entrypoint: &str, calldata: Vec<Felt>) -> Result<Vec<Felt>> {
        let entry_point_selector = parse_selector(entrypoint)?;
        self.provider
            .call(
                FunctionCall {
                    contract_address: self.contract,
                    entry_point_selector,
                    calldata,
                },
                BlockId::Tag(BlockTag::Latest),
            )
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))
    }

    async fn invoke(&self, calls: Vec<Call>) -> Result<Felt> {
        let result = self
            .account
            .execute_v3(calls)
            .send()
            .await
            .map_err(|e| ClientError::WriteRejected(e.to_string()))?;
        Ok(result.transaction_hash)
    }

    /// Poll the receipt until the ledger reports the transaction. There is
    /// no deadline: the caller keeps rendering the last fetched state while
    /// the ledger confirms at its own pace.
    async fn wait_for_settlement(&self, tx_hash: Felt) -> Result<()> {
        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(receipt) => {
                    return match receipt.receipt.execution_result() {
                        ExecutionResult::Succeeded => Ok(()),
                        ExecutionResult::Reverted { reason } => {
                            Err(ClientError::WriteRejected(format!(
                                "Transaction {:#x} reverted: {}",
                                tx_hash, reason
                            )))
                        }
                    };
                }
                Err(ProviderError::StarknetError(StarknetError::TransactionHashNotFound)) => {
                    sleep(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS)).await;
                }
                Err(e) => return Err(ClientError::Rpc(e.to_string())),
            }
        }
    }

    async fn submit(&self, label: &str, calls: Vec<Call>) -> Result<()> {
        self.ensure_abi().await?;
        let tx_hash = self.invoke(calls).await?;
        tracing::debug!("{} submitted as {:#x}", label, tx_hash);
        self.wait_for_settlement(tx_hash).await
    }

    fn game_call(&self, entrypoint: &str, calldata: Vec<Felt>) -> Result<Call> {
        Ok(Call {
            to: self.contract,
            selector: parse_selector(entrypoint)?,
            calldata,
        })
    }

    /// ERC-20 transfer to the game contract, batched in front of a game
    /// entrypoint to carry a payment. Amount is u256 low/high on the wire.
    fn payment_call(&self, amount: u128) -> Result<Call> {
        Ok(Call {
            to: self.stake_token,
            selector: parse_selector("transfer")?,
            calldata: vec![self.contract, Felt::from(amount), Felt::ZERO],
        })
    }
}

#[async_trait]
impl LedgerGateway for CheckersContract {
    async fn admin_address(&self) -> Result<Felt> {
        let output = self.call("get_admin_address", vec![]).await?;
        output.first().copied().ok_or_else(|| {
            ClientError::Decode("get_admin_address returned an empty response".to_string())
        })
    }

    async fn player(&self, account: Felt) -> Result<Player> {
        let output = self.call("get_player", vec![account]).await?;
        Player::decode(&output)
    }

    async fn sender_games(&self, account: Felt) -> Result<Vec<Game>> {
        let output = self.call("get_sender_games", vec![account]).await?;
        Game::decode_list(&output)
    }

    async fn register(&self) -> Result<()> {
        let calls = vec![
            self.payment_call(REGISTRATION_FEE)?,
            self.game_call("register", vec![])?,
        ];
        self.submit("register", calls).await
    }

    async fn create_game(&self, stake: u128) -> Result<()> {
        let calls = vec![self.game_call("create_game", vec![Felt::from(stake)])?];
        self.submit("create_game", calls).await
    }

    async fn join_game(&self, game_id: u64, stake: u128) -> Result<()> {
        let calls = vec![
            self.payment_call(stake)?,
            self.game_call("join_game", vec![Felt::from(game_id)])?,
        ];
        self.submit("join_game", calls).await
    }

    async fn make_move(&self, mv: Move) -> Result<()> {
        let calls = vec![self.game_call(
            "make_move",
            vec![
                Felt::from(mv.game_id),
                Felt::from(mv.from_x),
                Felt::from(mv.from_y),
                Felt::from(mv.to_x),
                Felt::from(mv.to_y),
            ],
        )?];
        self.submit("make_move", calls).await
    }
}

fn external_selectors_from_class(class: &ContractClass) -> HashSet<Felt> {
    match class {
        ContractClass::Sierra(sierra) => sierra
            .entry_points_by_type
            .external
            .iter()
            .map(|entry| entry.selector)
            .collect(),
        ContractClass::Legacy(legacy) => legacy
            .entry_points_by_type
            .external
            .iter()
            .map(|entry| entry.selector)
            .collect(),
    }
}

pub fn resolve_wallet_account(config: &Config) -> Option<&str> {
    if let Some(addr) = &config.wallet_account_address {
        return Some(addr.as_str());
    }
    if config.wallet_public_key.starts_with("0x") {
        return Some(config.wallet_public_key.as_str());
    }
    None
}

pub fn parse_selector(name: &str) -> Result<Felt> {
    get_selector_from_name(name)
        .map_err(|e| ClientError::Config(format!("Selector error: {}", e)))
}

pub fn parse_chain_id(chain_id: &str) -> Result<Felt> {
    if chain_id.starts_with("0x") {
        return parse_felt(chain_id);
    }
    let hex = hex::encode(chain_id.as_bytes());
    parse_felt(&format!("0x{hex}"))
}

pub fn parse_felt(value: &str) -> Result<Felt> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Config("Empty field element".to_string()));
    }
    if trimmed.starts_with("0x") {
        return Felt::from_hex(trimmed)
            .map_err(|e| ClientError::Config(format!("Invalid felt hex: {}", e)));
    }
    Felt::from_dec_str(trimmed)
        .map_err(|e| ClientError::Config(format!("Invalid felt dec: {}", e)))
}

pub fn felt_to_u128(value: &Felt) -> Result<u128> {
    let text = value.to_string();
    if let Some(stripped) = text.strip_prefix("0x") {
        u128::from_str_radix(stripped, 16)
            .map_err(|e| ClientError::Decode(format!("Invalid felt hex: {}", e)))
    } else {
        text.parse::<u128>()
            .map_err(|e| ClientError::Decode(format!("Invalid felt dec: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_felt_accepts_hex_and_decimal() {
        assert_eq!(parse_felt("0x1234").unwrap(), parse_felt("4660").unwrap());
    }

    #[test]
    fn parse_felt_ignores_leading_zeroes() {
        assert_eq!(parse_felt("0x000abc").unwrap(), parse_felt("0xabc").unwrap());
    }

    #[test]
    fn parse_felt_rejects_empty_input() {
        match parse_felt("   ") {
            Err(ClientError::Config(msg)) => assert!(msg.contains("Empty")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn chain_id_encodes_short_strings() {
        let main = parse_chain_id("SN_MAIN").unwrap();
        assert_eq!(main, parse_felt("0x534e5f4d41494e").unwrap());
        // already-encoded ids pass through
        assert_eq!(parse_chain_id("0x534e5f4d41494e").unwrap(), main);
    }

    #[test]
    fn felt_round_trips_small_values() {
        assert_eq!(felt_to_u128(&Felt::from(42_u64)).unwrap(), 42);
        assert_eq!(felt_to_u128(&Felt::ZERO).unwrap(), 0);
    }
}
