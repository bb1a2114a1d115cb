use alloy_primitives::Address;
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while converting between raw and decimal token quantities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("invalid numeric input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("{value} does not fit in {decimals}-decimal representation")]
    Overflow { value: String, decimals: u8 },
}

/// Quote resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("no exchange registered for token {symbol} ({token})")]
    ExchangeNotFound { token: Address, symbol: String },

    #[error("pair {base}/{quote} does not include the anchor token {anchor}")]
    UnsupportedPair {
        base: String,
        quote: String,
        anchor: String,
    },

    #[error("exchange {exchange} quoted zero {quote} for {size} {base}")]
    EmptyQuote {
        exchange: Address,
        base: String,
        quote: String,
        size: rust_decimal::Decimal,
    },
}

/// Gas price resolution errors.
#[derive(Error, Debug)]
pub enum GasPriceError {
    #[error("gas price unavailable: {0}")]
    Unavailable(String),
}

/// Transaction lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("transaction validation failed: {0}")]
    Validation(String),

    #[error("transaction preparation failed: {0}")]
    Preparation(String),

    #[error("transaction send failed: {0}")]
    Send(String),

    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("transaction event stream closed before settlement")]
    StreamClosed,

    #[error("transaction already settled as {0}")]
    AlreadySettled(crate::domain::TransactionState),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Numeric(#[from] NumericError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    GasPrice(#[from] GasPriceError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("cycle cancelled")]
    Cancelled,
}

impl Error {
    /// Short machine-friendly label used as a structured log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Numeric(_) => "invalid_numeric_input",
            Self::Quote(QuoteError::ExchangeNotFound { .. }) => "exchange_not_found",
            Self::Quote(_) => "quote",
            Self::GasPrice(_) => "gas_price_unavailable",
            Self::Execution(ExecutionError::Validation(_)) => "transaction_validation",
            Self::Execution(ExecutionError::Preparation(_)) => "transaction_preparation",
            Self::Execution(_) => "transaction_send",
            Self::Rpc(_) => "rpc",
            Self::Cancelled => "cancelled",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
