//! Chain access and contract addresses.

use alloy_primitives::Address;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// 1 for mainnet; also selects the block explorer used in logs.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
}

const fn default_chain_id() -> u64 {
    1
}

/// Melon fund contracts.
#[derive(Debug, Clone, Deserialize)]
pub struct FundConfig {
    pub hub: Address,
    pub accounting: Address,
    pub trading: Address,
}

/// Uniswap factory and the fund's registered Uniswap adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    pub factory: Address,
    pub adapter: Address,
}

/// Wallet configuration for signing transactions.
/// Private key is loaded from `WALLET_PRIVATE_KEY` env var at runtime (never from config file).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    #[serde(skip)]
    pub private_key: Option<String>,
}
