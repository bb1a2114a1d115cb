//! Concrete implementations of the [`crate::port`] traits.

pub mod gas_station;

#[cfg(feature = "onchain")]
pub mod melon;
