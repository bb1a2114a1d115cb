//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable overrides
//! for sensitive values like `WALLET_PRIVATE_KEY`.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{units, TokenDefinition, TradingPair};
use crate::error::{ConfigError, Result};

mod chain;
mod gas;
mod logging;
mod scheduler;
mod strategy;

pub use chain::{ExchangeConfig, FundConfig, NetworkConfig, WalletConfig};
pub use gas::GasConfig;
pub use logging::LoggingConfig;
pub use scheduler::SchedulerConfig;
pub use strategy::{PairConfig, StrategyConfig};

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub fund: FundConfig,
    pub exchange: ExchangeConfig,
    /// Every token the bot may need to describe.
    pub tokens: Vec<TokenDefinition>,
    pub pair: PairConfig,
    #[serde(default)]
    pub strategy: StrategyConfig,
    pub gas: GasConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        // Load private key from environment variable (never from config file for security)
        config.wallet.private_key = std::env::var("WALLET_PRIVATE_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        config.validate()?;

        Ok(config)
    }

    /// Parse and validate without consulting the environment.
    #[allow(clippy::result_large_err)]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        require_url("network.rpc_url", &self.network.rpc_url)?;
        require_url("gas.feed_url", &self.gas.feed_url)?;

        let mut symbols = HashSet::new();
        for token in &self.tokens {
            if token.decimals > units::MAX_DECIMALS {
                return Err(ConfigError::InvalidValue {
                    field: "tokens.decimals",
                    reason: format!(
                        "{} has {} decimals, at most {} are supported",
                        token.symbol,
                        token.decimals,
                        units::MAX_DECIMALS
                    ),
                }
                .into());
            }
            if !symbols.insert(token.symbol.to_ascii_uppercase()) {
                return Err(ConfigError::InvalidValue {
                    field: "tokens.symbol",
                    reason: format!("{} is defined twice", token.symbol),
                }
                .into());
            }
        }

        self.trading_pair()?;

        if self.strategy.dust_threshold <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "strategy.dust_threshold",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.strategy.slippage <= Decimal::ZERO || self.strategy.slippage > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "strategy.slippage",
                reason: format!("must be in (0, 1], got {}", self.strategy.slippage),
            }
            .into());
        }

        if self.gas.max_wait_minutes <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "gas.max_wait_minutes",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.gas.price_divisor <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "gas.price_divisor",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.gas.fallback_gwei.is_some_and(|gwei| gwei <= Decimal::ZERO) {
            return Err(ConfigError::InvalidValue {
                field: "gas.fallback_gwei",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.gas.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gas.timeout_secs",
                reason: "must be positive".into(),
            }
            .into());
        }

        if self.scheduler.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scheduler.interval_secs",
                reason: "must be positive".into(),
            }
            .into());
        }

        Ok(())
    }

    /// Token definition by symbol, case-insensitively.
    #[must_use]
    pub fn token(&self, symbol: &str) -> Option<&TokenDefinition> {
        self.tokens
            .iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Resolve `[pair]` against `[[tokens]]`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a symbol is undefined or the pair is
    /// malformed.
    pub fn trading_pair(&self) -> std::result::Result<TradingPair, ConfigError> {
        let lookup = |field: &'static str, symbol: &str| {
            self.token(symbol).cloned().ok_or_else(|| ConfigError::InvalidValue {
                field,
                reason: format!("no [[tokens]] entry for {symbol}"),
            })
        };

        let one = lookup("pair.one", &self.pair.one)?;
        let two = lookup("pair.two", &self.pair.two)?;
        let anchor = lookup("pair.anchor", &self.pair.anchor)?;
        let tie_break = match &self.pair.tie_break {
            Some(symbol) => lookup("pair.tie_break", symbol)?,
            None => one.clone(),
        };

        TradingPair::try_new(one, two, &anchor.symbol, &tie_break.symbol)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn require_url(field: &'static str, value: &str) -> std::result::Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    let url = url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    // Both the RPC provider and the gas feed client speak plain HTTP(S).
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported endpoint protocol '{scheme}', expected http or https"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::PolicyKind;
    use crate::error::Error;
    use crate::testkit::config::SAMPLE;
    use rust_decimal_macros::dec;

    fn with(replace: &str, by: &str) -> String {
        assert!(SAMPLE.contains(replace), "sample lacks {replace}");
        SAMPLE.replace(replace, by)
    }

    fn invalid_field(result: Result<Config>) -> &'static str {
        match result {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            Err(Error::Config(ConfigError::MissingField { field })) => field,
            other => panic!("expected a field error, got {other:?}"),
        }
    }

    #[test]
    fn sample_parses_with_defaults() {
        let config = Config::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.network.chain_id, 1);
        assert_eq!(config.tokens.len(), 2);
        assert_eq!(config.strategy.dust_threshold, dec!(0.1));
        assert_eq!(config.strategy.slippage, dec!(0.97));
        assert_eq!(config.strategy.policy, PolicyKind::Always);
        assert_eq!(config.gas.max_wait_minutes, dec!(2));
        assert_eq!(config.gas.price_divisor, dec!(1));
        assert_eq!(config.gas.fallback_gwei, None);
        assert_eq!(config.scheduler.interval_secs, 60);
        assert!(!config.scheduler.dry_run);
        assert_eq!(config.logging.level, "info");
        assert!(config.wallet.private_key.is_none());
    }

    #[test]
    fn pair_resolves_symbols_and_defaults_tie_break_to_one() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let pair = config.trading_pair().unwrap();

        assert_eq!(pair.one().symbol, "WETH");
        assert_eq!(pair.two().symbol, "MLN");
        assert_eq!(pair.anchor().symbol, "WETH");
        assert_eq!(pair.tie_break().symbol, "WETH");
    }

    #[test]
    fn explicit_tie_break_is_honored() {
        let toml = with("anchor = \"WETH\"", "anchor = \"WETH\"\ntie_break = \"MLN\"");
        let pair = Config::from_toml_str(&toml).unwrap().trading_pair().unwrap();
        assert_eq!(pair.tie_break().symbol, "MLN");
    }

    #[test]
    fn rejects_unknown_pair_token() {
        let toml = with("two = \"MLN\"", "two = \"ZRX\"");
        assert_eq!(invalid_field(Config::from_toml_str(&toml)), "pair.two");
    }

    #[test]
    fn rejects_out_of_range_slippage() {
        let toml = with("[strategy]", "[strategy]\nslippage = 1.5");
        assert_eq!(invalid_field(Config::from_toml_str(&toml)), "strategy.slippage");
    }

    #[test]
    fn rejects_zero_interval() {
        let toml = with("[scheduler]", "[scheduler]\ninterval_secs = 0");
        assert_eq!(invalid_field(Config::from_toml_str(&toml)), "scheduler.interval_secs");
    }

    #[test]
    fn rejects_excessive_decimals() {
        let toml = with("decimals = 18\n\n[[tokens]]\nsymbol = \"MLN\"", "decimals = 30\n\n[[tokens]]\nsymbol = \"MLN\"");
        assert_eq!(invalid_field(Config::from_toml_str(&toml)), "tokens.decimals");
    }

    #[test]
    fn rejects_empty_rpc_url() {
        let toml = with("rpc_url = \"http://127.0.0.1:8545\"", "rpc_url = \"\"");
        assert_eq!(invalid_field(Config::from_toml_str(&toml)), "network.rpc_url");
    }

    #[test]
    fn rejects_websocket_rpc_url() {
        let toml = with("rpc_url = \"http://127.0.0.1:8545\"", "rpc_url = \"wss://mainnet.example/ws\"");
        assert_eq!(invalid_field(Config::from_toml_str(&toml)), "network.rpc_url");
    }

    #[test]
    fn rejects_non_http_gas_feed() {
        let toml = with("feed_url = \"http://127.0.0.1:9/gas\"", "feed_url = \"ftp://127.0.0.1/gas\"");
        assert_eq!(invalid_field(Config::from_toml_str(&toml)), "gas.feed_url");
    }

    #[test]
    fn accepts_https_endpoints() {
        let toml = with("rpc_url = \"http://127.0.0.1:8545\"", "rpc_url = \"https://mainnet.example/v3/key\"");
        assert!(Config::from_toml_str(&toml).is_ok());
    }

    #[test]
    fn rejects_malformed_address() {
        let toml = with(
            "hub = \"0x1111111111111111111111111111111111111111\"",
            "hub = \"0x1234\"",
        );
        assert!(matches!(
            Config::from_toml_str(&toml),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
    }
}
