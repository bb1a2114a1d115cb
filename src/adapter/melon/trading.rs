//! Order submission through the fund's trading contract.
//!
//! The fund never talks to Uniswap directly: the manager asks the trading
//! contract to `callOnExchange`, which forwards `takeOrder` to the registered
//! Uniswap adapter.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::network::{Ethereum, Network, ReceiptResponse, TransactionBuilder};
use alloy_provider::{DynProvider, Provider};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::contracts::{ITrading, TAKE_ORDER_SIGNATURE};
use crate::domain::{GasPriceQuote, OrderDescriptor, SendParams, TransactionEvent, TransactionReceipt};
use crate::error::{ExecutionError, Result};
use crate::port::{OrderTransaction, TradeVenue};

type TxRequest = <Ethereum as Network>::TransactionRequest;

pub struct MelonTrading {
    trading: Address,
    adapter_index: U256,
    manager: Address,
    provider: DynProvider,
}

impl MelonTrading {
    /// `adapter_index` is the Uniswap adapter's position in the trading
    /// contract's exchange registry (see [`super::fund::adapter_index`]).
    #[must_use]
    pub fn new(trading: Address, adapter_index: U256, manager: Address, provider: DynProvider) -> Self {
        Self {
            trading,
            adapter_index,
            manager,
            provider,
        }
    }

    fn calldata(&self, order: &OrderDescriptor) -> Bytes {
        take_order_call(self.adapter_index, self.manager, order)
            .abi_encode()
            .into()
    }
}

/// `callOnExchange` arguments for taking `order` through the adapter at
/// `adapter_index`.
///
/// Address slots: 0 = manager, 2 = maker asset, 3 = taker asset. Value
/// slots: 0 = maker quantity, 1 = taker quantity, 6 = fill quantity.
pub(crate) fn take_order_call(
    adapter_index: U256,
    manager: Address,
    order: &OrderDescriptor,
) -> ITrading::callOnExchangeCall {
    let zero = Address::ZERO;
    ITrading::callOnExchangeCall {
        exchangeIndex: adapter_index,
        methodSignature: TAKE_ORDER_SIGNATURE.to_string(),
        orderAddresses: [
            manager,
            zero,
            order.maker_asset,
            order.taker_asset,
            zero,
            zero,
            zero,
            zero,
        ],
        orderValues: [
            order.maker_quantity,
            order.taker_quantity,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            U256::ZERO,
            // fill the whole taker side
            order.taker_quantity,
            U256::ZERO,
        ],
        identifier: B256::ZERO,
        makerAssetData: Bytes::new(),
        takerAssetData: Bytes::new(),
        signature: Bytes::new(),
    }
}

impl TradeVenue for MelonTrading {
    fn take_order(&self, order: &OrderDescriptor) -> Box<dyn OrderTransaction> {
        let request = TxRequest::default()
            .with_from(self.manager)
            .with_to(self.trading)
            .with_input(self.calldata(order));

        Box::new(TakeOrderTransaction {
            request,
            from: self.manager,
            provider: self.provider.clone(),
        })
    }

    fn venue_name(&self) -> &'static str {
        "melon-uniswap"
    }
}

/// A built `callOnExchange(takeOrder)` transaction.
pub struct TakeOrderTransaction {
    request: TxRequest,
    from: Address,
    provider: DynProvider,
}

#[async_trait]
impl OrderTransaction for TakeOrderTransaction {
    async fn validate(&mut self) -> Result<()> {
        // A reverting dry run means the fund's policies or the exchange reject it.
        self.provider
            .call(self.request.clone())
            .await
            .map_err(|e| ExecutionError::Validation(e.to_string()))?;
        Ok(())
    }

    async fn prepare(&mut self, gas_price: &GasPriceQuote) -> Result<SendParams> {
        let gas_limit = self
            .provider
            .estimate_gas(self.request.clone())
            .await
            .map_err(|e| ExecutionError::Preparation(format!("gas estimation: {e}")))?;
        let nonce = self
            .provider
            .get_transaction_count(self.from)
            .pending()
            .await
            .map_err(|e| ExecutionError::Preparation(format!("nonce: {e}")))?;

        debug!(gas_limit, nonce, "Transaction prepared");
        Ok(SendParams {
            gas_limit,
            gas_price: gas_price.wei_per_gas,
            nonce,
        })
    }

    async fn send(self: Box<Self>, params: SendParams) -> Result<mpsc::Receiver<TransactionEvent>> {
        let request = self
            .request
            .with_gas_limit(params.gas_limit)
            .with_gas_price(params.gas_price)
            .with_nonce(params.nonce);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| ExecutionError::Send(e.to_string()))?;
        let hash = *pending.tx_hash();

        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            if tx.send(TransactionEvent::Pending(hash)).await.is_err() {
                return;
            }
            let event = match pending.get_receipt().await {
                Ok(receipt) if receipt.status() => TransactionEvent::Confirmed(TransactionReceipt {
                    tx_hash: receipt.transaction_hash(),
                    gas_used: receipt.gas_used(),
                    block_number: receipt.block_number(),
                }),
                Ok(receipt) => TransactionEvent::Failed(ExecutionError::Reverted {
                    tx_hash: receipt.transaction_hash().to_string(),
                }),
                Err(e) => TransactionEvent::Failed(ExecutionError::Send(e.to_string())),
            };
            let _ = tx.send(event).await;
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{mln, weth};

    const E18: u128 = 1_000_000_000_000_000_000;

    fn manager() -> Address {
        Address::repeat_byte(0x0a)
    }

    fn decode(order: &OrderDescriptor) -> ITrading::callOnExchangeCall {
        let data = take_order_call(U256::from(3), manager(), order).abi_encode();
        assert_eq!(&data[..4], ITrading::callOnExchangeCall::SELECTOR.as_slice());
        ITrading::callOnExchangeCall::abi_decode(&data).unwrap()
    }

    #[test]
    fn selling_token_for_anchor_places_assets_and_quantities() {
        let order = OrderDescriptor {
            maker_asset: weth().address,
            taker_asset: mln().address,
            maker_quantity: U256::from(1_843_000_000_000_000_000u128),
            taker_quantity: U256::from(5 * E18),
        };

        let call = decode(&order);

        assert_eq!(call.exchangeIndex, U256::from(3));
        assert_eq!(call.methodSignature, TAKE_ORDER_SIGNATURE);
        assert_eq!(call.orderAddresses[0], manager());
        assert_eq!(call.orderAddresses[2], weth().address);
        assert_eq!(call.orderAddresses[3], mln().address);
        assert_eq!(call.orderValues[0], order.maker_quantity);
        assert_eq!(call.orderValues[1], order.taker_quantity);
        assert_eq!(call.orderValues[6], order.taker_quantity);
    }

    #[test]
    fn selling_anchor_for_token_swaps_every_slot() {
        let order = OrderDescriptor {
            maker_asset: mln().address,
            taker_asset: weth().address,
            maker_quantity: U256::from(48_500_000_000_000_000_000u128),
            taker_quantity: U256::from(2 * E18),
        };

        let call = decode(&order);

        assert_eq!(call.orderAddresses[2], mln().address);
        assert_eq!(call.orderAddresses[3], weth().address);
        assert_eq!(call.orderValues[0], U256::from(48_500_000_000_000_000_000u128));
        assert_eq!(call.orderValues[1], U256::from(2 * E18));
        assert_eq!(call.orderValues[6], U256::from(2 * E18));
    }

    #[test]
    fn unused_slots_stay_empty() {
        let order = OrderDescriptor {
            maker_asset: weth().address,
            taker_asset: mln().address,
            maker_quantity: U256::from(1),
            taker_quantity: U256::from(2),
        };

        let call = decode(&order);

        for slot in [1, 4, 5, 6, 7] {
            assert_eq!(call.orderAddresses[slot], Address::ZERO, "address slot {slot}");
        }
        for slot in [2, 3, 4, 5, 7] {
            assert_eq!(call.orderValues[slot], U256::ZERO, "value slot {slot}");
        }
        assert_eq!(call.identifier, B256::ZERO);
        assert!(call.makerAssetData.is_empty());
        assert!(call.signature.is_empty());
    }
}
