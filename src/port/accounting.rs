use async_trait::async_trait;

use crate::domain::Holding;
use crate::error::Result;

/// Read access to the fund's holdings.
#[async_trait]
pub trait FundAccounting: Send + Sync {
    /// Every asset the fund currently holds, in accounting order.
    ///
    /// The list may be empty and may include tokens the bot does not track.
    async fn holdings(&self) -> Result<Vec<Holding>>;
}
