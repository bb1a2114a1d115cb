//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for tokens, pairs, holdings, quotes and receipts.
//! - [`ports`] - Scripted port doubles: accounting, exchange, gas, venue.
//! - [`config`] - Canonical test configuration TOML.

pub mod config;
pub mod domain;
pub mod ports;
