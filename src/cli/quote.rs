//! Handler for the `quote` command.

use crate::app::bootstrap;
use crate::cli::{run::load_config, Cli, QuoteArgs};
use crate::domain::units;
use crate::error::{ConfigError, Result};

pub async fn execute(cli: &Cli, args: &QuoteArgs) -> Result<()> {
    let config = load_config(cli)?;
    let pair = config.trading_pair()?;

    let (base, quote_token) = pair
        .by_symbol(&args.base)
        .and_then(|base| pair.other(base).map(|quote| (base.clone(), quote.clone())))
        .ok_or_else(|| ConfigError::InvalidValue {
            field: "--base",
            reason: format!("{} is not one of {}/{}", args.base, pair.one(), pair.two()),
        })?;
    let amount = units::parse_decimal(&args.amount)?;

    let engine = bootstrap::quote_engine(&config, bootstrap::read_only_provider(&config)?)?;
    let quote = engine.get_quote(&base, &quote_token, amount).await?;

    println!("exchange:  {}", quote.exchange);
    println!("sell:      {} {}", quote.size_in_base, quote.base);
    println!("receive:   {} {}", quote.size_in_quote, quote.quote);
    println!("price:     {} {} per {}", quote.price_in_base, quote.quote, quote.base);
    println!("inverse:   {} {} per {}", quote.price_in_quote, quote.base, quote.quote);
    Ok(())
}
