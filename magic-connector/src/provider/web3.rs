//! Provider wrapper and signer.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, hex};
use serde_json::{Value, json};
use tracing::debug;

use super::{EventListener, ListenerId, ProviderEventKind, SharedRpcProvider};
use crate::error::{ConnectorError, Result, RpcError};

/// Parse an address and return its EIP-55 checksummed form.
///
/// All-lowercase and all-uppercase input is accepted as is; mixed-case input
/// must carry a valid checksum.
pub fn checksum_address(address: &str) -> Result<String> {
    parse_address(address).map(|addr| addr.to_checksum(None))
}

fn parse_address(address: &str) -> Result<Address> {
    let trimmed = address.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let mixed_case = digits.bytes().any(|b| b.is_ascii_lowercase())
        && digits.bytes().any(|b| b.is_ascii_uppercase());
    let parsed = if mixed_case {
        Address::parse_checksummed(trimmed, None).ok()
    } else {
        Address::from_str(trimmed).ok()
    };
    parsed.ok_or_else(|| ConnectorError::InvalidAddress(address.to_string()))
}

/// A raw provider handle paired with the chain id of its network.
///
/// The network chain id starts at the value resolved when the wrapper is
/// built and follows chain switches performed through the connector.
pub struct Web3Provider {
    raw: SharedRpcProvider,
    network: AtomicU64,
}

impl std::fmt::Debug for Web3Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Web3Provider")
            .field("chain_id", &self.network_chain_id())
            .finish_non_exhaustive()
    }
}

impl Web3Provider {
    /// Wrap a raw provider for the given network.
    #[must_use]
    pub fn new(raw: SharedRpcProvider, chain_id: u64) -> Self {
        Self {
            raw,
            network: AtomicU64::new(chain_id),
        }
    }

    /// Chain id of the network this provider is connected to.
    #[must_use]
    pub fn network_chain_id(&self) -> u64 {
        self.network.load(Ordering::Acquire)
    }

    pub(crate) fn set_network_chain_id(&self, chain_id: u64) {
        let previous = self.network.swap(chain_id, Ordering::AcqRel);
        if previous != chain_id {
            debug!(from = previous, to = chain_id, "provider network changed");
        }
    }

    /// Send a JSON-RPC request through the raw provider.
    pub async fn send(&self, method: &str, params: Value) -> std::result::Result<Value, RpcError> {
        self.raw.request(method, params).await
    }

    /// Register an event listener on the raw provider.
    pub fn on(&self, event: ProviderEventKind, listener: EventListener) -> Option<ListenerId> {
        self.raw.on(event, listener)
    }

    /// Remove an event listener from the raw provider.
    pub fn remove_listener(&self, event: ProviderEventKind, id: ListenerId) {
        self.raw.remove_listener(event, id);
    }

    /// The underlying raw provider.
    #[must_use]
    pub const fn raw(&self) -> &SharedRpcProvider {
        &self.raw
    }

    /// A signer bound to this provider.
    #[must_use]
    pub fn signer(self: &Arc<Self>) -> JsonRpcSigner {
        JsonRpcSigner {
            provider: Arc::clone(self),
        }
    }
}

/// Signer that delegates to the wallet behind a [`Web3Provider`].
///
/// Keys never leave the wallet; every operation is an RPC request.
#[derive(Debug, Clone)]
pub struct JsonRpcSigner {
    provider: Arc<Web3Provider>,
}

impl JsonRpcSigner {
    /// The provider this signer is bound to.
    #[must_use]
    pub const fn provider(&self) -> &Arc<Web3Provider> {
        &self.provider
    }

    /// The first account exposed by the wallet.
    ///
    /// Fails with [`ConnectorError::AccountUnavailable`] when the wallet
    /// exposes no account (no authenticated session).
    pub async fn address(&self) -> Result<Address> {
        let accounts = self.provider.send("eth_accounts", json!([])).await?;
        let first = accounts
            .as_array()
            .and_then(|list| list.first())
            .and_then(Value::as_str)
            .ok_or(ConnectorError::AccountUnavailable)?;
        parse_address(first)
    }

    /// Sign a message with `personal_sign`, returning the hex signature.
    pub async fn sign_message(&self, message: &[u8]) -> Result<String> {
        let address = self.address().await?;
        let payload = format!("0x{}", hex::encode(message));
        let signature = self
            .provider
            .send("personal_sign", json!([payload, address.to_checksum(None)]))
            .await?;
        signature
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConnectorError::sdk(format!("unexpected signature: {signature}")))
    }
}
