//! On-chain collaborators: Melon v1 fund contracts and Uniswap v1.

mod accounting;
mod contracts;
pub mod fund;
mod trading;
mod uniswap;

pub use accounting::MelonAccounting;
pub use trading::{MelonTrading, TakeOrderTransaction};
pub use uniswap::UniswapExchanges;
