//! Startup checks against the fund's hub and trading contracts.

use alloy_primitives::{Address, U256};
use alloy_provider::DynProvider;
use tracing::info;

use super::contracts::{IHub, ITrading};
use crate::error::{ConfigError, Error, Result};

/// Fail unless `account` manages the fund behind `hub`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] on mismatch, or an RPC error.
pub async fn verify_manager(provider: &DynProvider, hub: Address, account: Address) -> Result<()> {
    let manager = IHub::new(hub, provider)
        .manager()
        .call()
        .await
        .map_err(|e| Error::Rpc(format!("manager(): {e}")))?;

    if manager != account {
        return Err(ConfigError::InvalidValue {
            field: "WALLET_PRIVATE_KEY",
            reason: format!("signer {account} is not the manager of fund {hub} (manager is {manager})"),
        }
        .into());
    }

    info!(hub = %hub, manager = %manager, "Fund manager verified");
    Ok(())
}

/// Position of `adapter` in the trading contract's exchange registry.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the adapter is not registered.
pub async fn adapter_index(provider: &DynProvider, trading: Address, adapter: Address) -> Result<U256> {
    let info = ITrading::new(trading, provider)
        .getExchangeInfo()
        .call()
        .await
        .map_err(|e| Error::Rpc(format!("getExchangeInfo: {e}")))?;

    let index = registry_position(&info.adapters, adapter).ok_or_else(|| ConfigError::InvalidValue {
        field: "exchange.adapter",
        reason: format!(
            "{adapter} is not among the {} exchanges registered with trading contract {trading}",
            info.adapters.len()
        ),
    })?;

    info!(adapter = %adapter, index, "Exchange adapter resolved");
    Ok(U256::from(index))
}

/// Index of `adapter` among the trading contract's registered adapters.
fn registry_position(adapters: &[Address], adapter: Address) -> Option<usize> {
    adapters.iter().position(|registered| *registered == adapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_registered_adapter() {
        let adapters = [Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3)];
        assert_eq!(registry_position(&adapters, Address::repeat_byte(2)), Some(1));
    }

    #[test]
    fn first_registration_wins() {
        let uniswap = Address::repeat_byte(5);
        let adapters = [Address::repeat_byte(1), uniswap, uniswap];
        assert_eq!(registry_position(&adapters, uniswap), Some(1));
    }

    #[test]
    fn unregistered_adapter_is_not_found() {
        let adapters = [Address::repeat_byte(1), Address::repeat_byte(2)];
        assert_eq!(registry_position(&adapters, Address::repeat_byte(9)), None);
        assert_eq!(registry_position(&[], Address::repeat_byte(9)), None);
    }
}
