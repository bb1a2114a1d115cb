//! Seesaw - an unattended two-asset rebalancing agent for a Melon fund.
//!
//! The fund holds one of two tracked tokens at a time. Every cycle the bot
//! reads the fund's holdings, quotes selling the whole position on the
//! matching Uniswap v1 exchange, asks a decision policy whether to trade,
//! builds a slippage-protected order, prices gas and drives the transaction
//! to exactly one terminal outcome.
//!
//! # Architecture
//!
//! - [`domain`] - Value types: tokens, amounts, quotes, orders, gas and
//!   transaction lifecycle, plus the raw/decimal [`domain::units`] converter
//! - [`port`] - Traits at every external seam (accounting, exchange, gas
//!   feed, order submission)
//! - [`application`] - Pipeline stages: balance evaluation, quoting,
//!   decision policies, order building, transaction execution
//! - [`adapter`] - HTTP gas feed and (feature `onchain`) Melon/Uniswap
//!   contract bindings
//! - [`app`] - The cycle scheduler and startup wiring
//! - [`config`] - TOML configuration and logging setup
//!
//! # Features
//!
//! - `onchain` (default) - alloy-backed contract adapters, bootstrap and CLI
//! - `testkit` - scripted port implementations for integration tests

pub mod adapter;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(feature = "onchain")]
pub mod cli;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
