use alloy_primitives::{Address, U256};

/// One entry of the fund's point-in-time balance snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holding {
    pub token: Address,
    pub raw_amount: U256,
}

impl Holding {
    #[must_use]
    pub const fn new(token: Address, raw_amount: U256) -> Self {
        Self { token, raw_amount }
    }
}
