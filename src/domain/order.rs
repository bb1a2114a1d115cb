use alloy_primitives::{Address, U256};

/// A take-order request for the fund's trading adapter.
///
/// The fund sells `taker_quantity` of `taker_asset` (the held token) and asks
/// for at least `maker_quantity` of `maker_asset` (the token being bought).
/// Each quantity is in its own asset's base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDescriptor {
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub maker_quantity: U256,
    pub taker_quantity: U256,
}
