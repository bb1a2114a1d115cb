//! Gas price oracle backed by an HTTP fee-tier feed.
//!
//! The feed maps gwei prices to estimated confirmation minutes:
//!
//! ```json
//! { "gasPriceRange": { "4": 30.5, "10": 2.1, "20": 0.5 }, "fast": 20 }
//! ```
//!
//! Some feeds (ethgasstation) publish prices in tenths of a gwei; set
//! `price_divisor = 10` for those.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::GasConfig;
use crate::domain::{units, GasPriceQuote, GasTier};
use crate::error::{ConfigError, GasPriceError, Result};
use crate::port::GasPriceOracle;

const GWEI_DECIMALS: u8 = 9;

/// Raw feed payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GasFeed {
    #[serde(rename = "gasPriceRange")]
    pub price_range: BTreeMap<String, Decimal>,
    pub fast: Decimal,
}

/// Cheapest feed price whose estimated wait is within `max_wait_minutes`,
/// or the feed's fast price if none qualifies.
///
/// # Errors
///
/// Returns [`GasPriceError::Unavailable`] if a tier key is not a number.
pub fn select_price(
    feed: &GasFeed,
    max_wait_minutes: Decimal,
) -> std::result::Result<(Decimal, GasTier), GasPriceError> {
    let mut tiers = feed
        .price_range
        .iter()
        .map(|(price, minutes)| {
            units::parse_decimal(price)
                .map(|price| (price, *minutes))
                .map_err(|e| GasPriceError::Unavailable(format!("bad tier '{price}': {e}")))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    tiers.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(tiers
        .into_iter()
        .find(|(_, minutes)| *minutes <= max_wait_minutes)
        .map_or((feed.fast, GasTier::Fast), |(price, minutes)| {
            (
                price,
                GasTier::Qualifying {
                    estimated_minutes: minutes,
                },
            )
        }))
}

pub struct GasStationOracle {
    http: HttpClient,
    feed_url: String,
    price_divisor: Decimal,
    fallback_gwei: Option<Decimal>,
}

impl GasStationOracle {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the HTTP client cannot be
    /// built with the configured timeout.
    pub fn from_config(config: &GasConfig) -> std::result::Result<Self, ConfigError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ConfigError::InvalidValue {
                field: "gas.timeout_secs",
                reason: format!("cannot build HTTP client: {err}"),
            })?;

        Ok(Self {
            http,
            feed_url: config.feed_url.clone(),
            price_divisor: config.price_divisor,
            fallback_gwei: config.fallback_gwei,
        })
    }

    async fn fetch(&self) -> std::result::Result<GasFeed, GasPriceError> {
        let unavailable = |e: reqwest::Error| GasPriceError::Unavailable(e.to_string());
        self.http
            .get(&self.feed_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unavailable)?
            .json::<GasFeed>()
            .await
            .map_err(unavailable)
    }

    fn to_wei(&self, feed_price: Decimal) -> std::result::Result<u128, GasPriceError> {
        let gwei = feed_price
            .checked_div(self.price_divisor)
            .ok_or_else(|| GasPriceError::Unavailable(format!("cannot scale {feed_price}")))?;
        let wei = units::to_base_units(gwei, GWEI_DECIMALS)
            .map_err(|e| GasPriceError::Unavailable(e.to_string()))?;
        u128::try_from(wei).map_err(|_| GasPriceError::Unavailable(format!("{gwei} gwei too large")))
    }

    async fn resolve_from_feed(
        &self,
        max_wait_minutes: Decimal,
    ) -> std::result::Result<GasPriceQuote, GasPriceError> {
        let feed = self.fetch().await?;
        debug!(tiers = feed.price_range.len(), fast = %feed.fast, "Gas feed fetched");
        let (price, tier) = select_price(&feed, max_wait_minutes)?;
        Ok(GasPriceQuote {
            wei_per_gas: self.to_wei(price)?,
            max_wait_minutes,
            tier,
        })
    }
}

#[async_trait]
impl GasPriceOracle for GasStationOracle {
    async fn resolve(&self, max_wait_minutes: Decimal) -> Result<GasPriceQuote> {
        let quote = match self.resolve_from_feed(max_wait_minutes).await {
            Ok(quote) => quote,
            Err(err) => {
                let Some(gwei) = self.fallback_gwei else {
                    return Err(err.into());
                };
                warn!(error = %err, fallback_gwei = %gwei, "Gas feed unavailable, using fallback price");
                let wei = units::to_base_units(gwei, GWEI_DECIMALS)
                    .ok()
                    .and_then(|wei| u128::try_from(wei).ok())
                    .ok_or_else(|| GasPriceError::Unavailable(format!("bad fallback {gwei}")))?;
                GasPriceQuote {
                    wei_per_gas: wei,
                    max_wait_minutes,
                    tier: GasTier::Fallback,
                }
            }
        };

        info!(
            wei_per_gas = quote.wei_per_gas,
            max_wait_minutes = %quote.max_wait_minutes,
            tier = %quote.tier,
            "Gas price resolved"
        );
        Ok(quote)
    }
}
