//! Minimal ABI surface of the Melon v1 fund and Uniswap v1 contracts.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    contract IHub {
        function manager() external view returns (address);
    }

    #[sol(rpc)]
    contract IAccounting {
        function getFundHoldings() external view returns (uint256[] memory amounts, address[] memory assets);
    }

    #[sol(rpc)]
    contract IUniswapFactory {
        function getExchange(address token) external view returns (address);
    }

    #[sol(rpc)]
    contract IUniswapExchange {
        function getEthToTokenInputPrice(uint256 eth_sold) external view returns (uint256);
        function getTokenToEthInputPrice(uint256 tokens_sold) external view returns (uint256);
    }

    #[sol(rpc)]
    contract ITrading {
        function getExchangeInfo() external view returns (address[] memory exchanges, address[] memory adapters, bool[] memory takesCustody);

        function callOnExchange(
            uint256 exchangeIndex,
            string methodSignature,
            address[8] orderAddresses,
            uint256[8] orderValues,
            bytes32 identifier,
            bytes makerAssetData,
            bytes takerAssetData,
            bytes signature
        ) external;
    }
}

/// Adapter method invoked through `callOnExchange`.
pub const TAKE_ORDER_SIGNATURE: &str = "takeOrder(address,address[8],uint256[8],bytes32,bytes,bytes,bytes)";
