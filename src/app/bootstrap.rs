//! Wiring the pipeline from configuration.

use std::str::FromStr;
use std::sync::Arc;

use alloy_provider::network::EthereumWallet;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use tracing::info;

use super::scheduler::{CycleScheduler, Pipeline};
use crate::adapter::gas_station::GasStationOracle;
use crate::adapter::melon::{fund, MelonAccounting, MelonTrading, UniswapExchanges};
use crate::application::{BalanceEvaluator, OrderBuilder, QuoteEngine, TransactionExecutor};
use crate::config::Config;
use crate::error::{ConfigError, Result};

fn rpc_url(config: &Config) -> Result<url::Url> {
    config
        .network
        .rpc_url
        .parse()
        .map_err(|e: url::ParseError| {
            ConfigError::InvalidValue {
                field: "network.rpc_url",
                reason: e.to_string(),
            }
            .into()
        })
}

fn signer(config: &Config) -> Result<PrivateKeySigner> {
    let key = config
        .wallet
        .private_key
        .as_deref()
        .ok_or(ConfigError::MissingField {
            field: "WALLET_PRIVATE_KEY",
        })?;

    // Chain id is filled per transaction by the provider.
    let signer = PrivateKeySigner::from_str(key).map_err(|e| ConfigError::InvalidValue {
        field: "WALLET_PRIVATE_KEY",
        reason: e.to_string(),
    })?;
    Ok(signer)
}

/// Provider for read-only queries; needs no key.
///
/// # Errors
///
/// Returns a configuration error for a malformed RPC URL.
pub fn read_only_provider(config: &Config) -> Result<DynProvider> {
    Ok(ProviderBuilder::new().connect_http(rpc_url(config)?).erased())
}

/// Quote engine over the configured Uniswap factory.
///
/// # Errors
///
/// Returns a configuration error if the pair cannot be resolved.
pub fn quote_engine(config: &Config, provider: DynProvider) -> Result<QuoteEngine> {
    let pair = config.trading_pair()?;
    let exchanges = Arc::new(UniswapExchanges::new(config.exchange.factory, provider));
    Ok(QuoteEngine::new(pair.anchor().clone(), exchanges.clone(), exchanges))
}

/// Build a ready-to-run scheduler.
///
/// Verifies that the signer manages the fund and resolves the Uniswap
/// adapter's exchange index before returning.
///
/// # Errors
///
/// Fails on missing or invalid configuration, a signer that is not the fund
/// manager, an unregistered adapter, or RPC errors during these checks.
pub async fn build_scheduler(config: &Config) -> Result<CycleScheduler> {
    let signer = signer(config)?;
    let manager = signer.address();
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(rpc_url(config)?)
        .erased();

    info!(
        chain_id = config.network.chain_id,
        account = %manager,
        hub = %config.fund.hub,
        "Connecting to fund"
    );
    fund::verify_manager(&provider, config.fund.hub, manager).await?;
    let adapter_index =
        fund::adapter_index(&provider, config.fund.trading, config.exchange.adapter).await?;

    let pair = config.trading_pair()?;
    let pipeline = Pipeline {
        accounting: Arc::new(MelonAccounting::new(config.fund.accounting, provider.clone())),
        evaluator: BalanceEvaluator::new(pair, config.strategy.dust_threshold)?,
        quotes: quote_engine(config, provider.clone())?,
        policy: config.strategy.policy.build(config.strategy.seed),
        orders: OrderBuilder::new(config.strategy.slippage)?,
        gas: Arc::new(GasStationOracle::from_config(&config.gas)?),
        max_wait_minutes: config.gas.max_wait_minutes,
        venue: Arc::new(MelonTrading::new(
            config.fund.trading,
            adapter_index,
            manager,
            provider,
        )),
        executor: TransactionExecutor::for_chain(config.network.chain_id),
        dry_run: config.scheduler.dry_run,
    };

    Ok(CycleScheduler::new(pipeline, config.scheduler.interval()))
}
