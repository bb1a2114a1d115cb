//! Builders for domain primitives used across tests.
//!
//! The canonical test pair is WETH (anchor, tie-break) against MLN, both at
//! 18 decimals. DAI is deliberately given 6 decimals so that mixed-precision
//! paths are exercised.

use alloy_primitives::{Address, TxHash, U256};
use rust_decimal::Decimal;

use crate::domain::{
    units, GasPriceQuote, GasTier, Holding, Quote, TokenDefinition, TradingPair,
    TransactionReceipt,
};

pub fn weth() -> TokenDefinition {
    TokenDefinition::new("WETH", Address::repeat_byte(0x01), 18)
}

pub fn mln() -> TokenDefinition {
    TokenDefinition::new("MLN", Address::repeat_byte(0x02), 18)
}

pub fn dai() -> TokenDefinition {
    TokenDefinition::new("DAI", Address::repeat_byte(0x03), 6)
}

/// WETH/MLN with WETH as anchor and tie-break.
pub fn pair() -> TradingPair {
    TradingPair::try_new(weth(), mln(), "WETH", "WETH").expect("valid test pair")
}

/// Holding of `amount` whole tokens.
pub fn holding(token: &TokenDefinition, amount: Decimal) -> Holding {
    let raw = units::to_base_units(amount, token.decimals).expect("representable amount");
    Holding::new(token.address, raw)
}

/// Holding given directly in base units.
pub fn raw_holding(token: &TokenDefinition, raw: u128) -> Holding {
    Holding::new(token.address, U256::from(raw))
}

/// WETH -> MLN quote at the given sizes.
pub fn quote(size_in_base: Decimal, size_in_quote: Decimal) -> Quote {
    Quote::from_sizes(weth(), mln(), size_in_base, size_in_quote, exchange_address())
        .expect("valid test quote")
}

/// Exchange address the test fixtures register for MLN.
pub fn exchange_address() -> Address {
    Address::repeat_byte(0xee)
}

/// Gas price of `gwei` at the default 2 minute ceiling.
pub fn gas_quote(gwei: u64) -> GasPriceQuote {
    GasPriceQuote {
        wei_per_gas: u128::from(gwei) * 1_000_000_000,
        max_wait_minutes: Decimal::TWO,
        tier: GasTier::Fast,
    }
}

pub fn tx_hash(n: u8) -> TxHash {
    TxHash::repeat_byte(n)
}

pub fn receipt(n: u8) -> TransactionReceipt {
    TransactionReceipt {
        tx_hash: tx_hash(n),
        gas_used: 21_000 + u64::from(n),
        block_number: Some(1_000 + u64::from(n)),
    }
}
