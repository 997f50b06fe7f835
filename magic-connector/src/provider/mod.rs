//! The injected-provider surface the connector talks to.
//!
//! [`RpcProvider`] is the EIP-1193 shape exposed by a wallet SDK: a single
//! `request` entry point plus optional event subscription. The connector
//! wraps the raw handle in a [`Web3Provider`] that also tracks the network
//! chain id.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RpcError;

mod web3;

pub use web3::{JsonRpcSigner, Web3Provider, checksum_address};

/// Events a provider may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    /// The exposed accounts changed.
    AccountsChanged,
    /// The connected chain changed.
    ChainChanged,
    /// The provider disconnected from all chains.
    Disconnect,
}

impl ProviderEventKind {
    /// All event kinds the connector listens to.
    pub const ALL: [Self; 3] = [Self::AccountsChanged, Self::ChainChanged, Self::Disconnect];

    /// The EIP-1193 event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountsChanged => "accountsChanged",
            Self::ChainChanged => "chainChanged",
            Self::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for ProviderEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event emitted by a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    /// New list of exposed accounts (empty when locked or logged out).
    AccountsChanged(Vec<String>),
    /// New chain id, as reported by the provider (number or string).
    ChainChanged(Value),
    /// Disconnected, with the provider's reason if any.
    Disconnect(Option<RpcError>),
}

impl ProviderEvent {
    /// The kind of this event.
    #[must_use]
    pub const fn kind(&self) -> ProviderEventKind {
        match self {
            Self::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            Self::ChainChanged(_) => ProviderEventKind::ChainChanged,
            Self::Disconnect(_) => ProviderEventKind::Disconnect,
        }
    }
}

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Callback invoked for provider events.
pub type EventListener = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

/// EIP-1193 style provider handle.
///
/// Implemented by wallet SDKs. Event support is optional: providers that
/// cannot emit events keep the default [`on`](Self::on), which returns
/// `None`.
#[async_trait]
pub trait RpcProvider: Send + Sync {
    /// Send a JSON-RPC request.
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError>;

    /// Register a listener. Returns `None` when events are not supported.
    fn on(&self, event: ProviderEventKind, listener: EventListener) -> Option<ListenerId> {
        let _ = (event, listener);
        None
    }

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&self, event: ProviderEventKind, id: ListenerId) {
        let _ = (event, id);
    }
}

/// A shared, type-erased provider.
pub type SharedRpcProvider = Arc<dyn RpcProvider>;
