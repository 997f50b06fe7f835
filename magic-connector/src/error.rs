//! Error types for the connector.
//!
//! The taxonomy mirrors what a host dApp framework expects from a wallet
//! connector:
//! - [`ConnectorError::UserRejected`] for any failed connect/login round-trip
//! - chain errors ([`ChainNotConfigured`](ConnectorError::ChainNotConfigured),
//!   [`AddChain`](ConnectorError::AddChain), [`SwitchChain`](ConnectorError::SwitchChain))
//! - fatal configuration errors raised before any asynchronous call

use serde_json::Value;

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// The main error type for connector operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConnectorError {
    /// The user rejected the request, or the connect sequence failed.
    ///
    /// The underlying cause is not carried.
    #[error("User rejected request: {message}")]
    UserRejected {
        /// Human readable message.
        message: String,
    },

    /// The chain is not part of the configured chain list.
    #[error("Chain not configured{}", format_chain_reason(*chain_id, reason.as_deref()))]
    ChainNotConfigured {
        /// The offending chain id, when known.
        chain_id: Option<u64>,
        /// Additional context.
        reason: Option<String>,
    },

    /// The wallet refused to add an unknown chain.
    #[error("Error adding chain")]
    AddChain,

    /// Switching chains failed for a reason other than an unknown chain.
    #[error("Error switching chain: {0}")]
    SwitchChain(#[source] RpcError),

    /// Fatal configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No authenticated account is available.
    #[error("No authenticated account available")]
    AccountUnavailable,

    /// A value could not be parsed as an address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A value could not be parsed as a chain id.
    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),

    /// The RPC provider returned an error.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// The wallet SDK reported an error.
    #[error("SDK error: {0}")]
    Sdk(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_chain_reason(chain_id: Option<u64>, reason: Option<&str>) -> String {
    match (chain_id, reason) {
        (Some(id), Some(reason)) => format!(" (chain {id}): {reason}"),
        (Some(id), None) => format!(" (chain {id})"),
        (None, Some(reason)) => format!(": {reason}"),
        (None, None) => String::new(),
    }
}

impl ConnectorError {
    /// Create the generic "something went wrong" rejection.
    #[must_use]
    pub fn user_rejected() -> Self {
        Self::UserRejected {
            message: "Something went wrong".into(),
        }
    }

    /// Create a chain-not-configured error for a specific chain id.
    #[must_use]
    pub const fn chain_not_configured(chain_id: u64) -> Self {
        Self::ChainNotConfigured {
            chain_id: Some(chain_id),
            reason: None,
        }
    }

    /// Create a chain-not-configured error with a reason and no chain id.
    #[must_use]
    pub fn missing_network(reason: impl Into<String>) -> Self {
        Self::ChainNotConfigured {
            chain_id: None,
            reason: Some(reason.into()),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an SDK error.
    #[must_use]
    pub fn sdk(msg: impl Into<String>) -> Self {
        Self::Sdk(msg.into())
    }

    /// Whether this error is the generic user rejection.
    #[must_use]
    pub const fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected { .. })
    }
}

/// An EIP-1193 provider error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct RpcError {
    /// Numeric error code.
    pub code: i64,
    /// Error message.
    pub message: String,
    /// Optional extra data attached by the provider.
    pub data: Option<Value>,
}

impl RpcError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested method or account has not been authorized.
    pub const UNAUTHORIZED: i64 = 4100;
    /// The provider does not support the requested method.
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    /// The provider is disconnected from all chains.
    pub const DISCONNECTED: i64 = 4900;
    /// The provider is not connected to the requested chain.
    pub const CHAIN_DISCONNECTED: i64 = 4901;
    /// The chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    /// Create a new provider error.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach provider data to the error.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Whether this error signals a chain unknown to the wallet.
    #[must_use]
    pub const fn is_unrecognized_chain(&self) -> bool {
        self.code == Self::UNRECOGNIZED_CHAIN
    }
}
