//! Chain descriptors and the configured chain list.
//!
//! A [`Chain`] describes an EVM network the host application supports. The
//! connector only ever reads these descriptors: it looks chains up by id,
//! reports whether a chain id is supported, and forwards descriptor fields
//! to the wallet when asking it to add a chain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConnectorError, Result};

pub mod known;

/// Native currency of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    /// Currency name (e.g. "Ether").
    pub name: String,
    /// Ticker symbol (e.g. "ETH").
    pub symbol: String,
    /// Number of decimals.
    pub decimals: u8,
}

impl NativeCurrency {
    /// Create a native currency descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// RPC endpoints of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcUrls {
    /// Endpoint used by the wallet SDK.
    pub default: String,
    /// Public endpoint advertised to wallets when adding the chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<String>,
}

impl RpcUrls {
    /// Endpoint the wallet SDK should talk to (`default`, else `public`).
    #[must_use]
    pub fn sdk_url(&self) -> &str {
        if self.default.is_empty() {
            self.public.as_deref().unwrap_or_default()
        } else {
            &self.default
        }
    }

    /// Endpoint advertised to a wallet adding the chain (`public`, else `default`).
    #[must_use]
    pub fn wallet_url(&self) -> &str {
        self.public.as_deref().unwrap_or(&self.default)
    }
}

/// A block explorer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExplorer {
    /// Display name.
    pub name: String,
    /// Base URL.
    pub url: String,
}

/// Block explorers of a chain: one default plus any named extras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExplorers {
    /// The default explorer.
    pub default: BlockExplorer,
    /// Additional explorers keyed by name.
    #[serde(flatten)]
    pub others: BTreeMap<String, BlockExplorer>,
}

/// Descriptor of an EVM chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    /// EIP-155 chain id.
    pub id: u64,
    /// Human readable name.
    pub name: String,
    /// Short network identifier (e.g. "homestead").
    #[serde(default)]
    pub network: String,
    /// Native currency.
    pub native_currency: NativeCurrency,
    /// RPC endpoints.
    pub rpc_urls: RpcUrls,
    /// Block explorers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_explorers: Option<BlockExplorers>,
    /// Whether this is a test network.
    #[serde(default)]
    pub testnet: bool,
}

impl Chain {
    /// Explorer URLs advertised to a wallet: the default first, then the rest.
    #[must_use]
    pub fn block_explorer_urls(&self) -> Option<Vec<String>> {
        self.block_explorers.as_ref().map(|explorers| {
            std::iter::once(&explorers.default)
                .chain(explorers.others.values())
                .map(|explorer| explorer.url.clone())
                .collect()
        })
    }

    /// Parameters for a `wallet_addEthereumChain` request.
    #[must_use]
    pub fn add_chain_params(&self) -> Value {
        let mut params = serde_json::json!({
            "chainId": hex_value(self.id),
            "chainName": self.name,
            "nativeCurrency": self.native_currency,
            "rpcUrls": [self.rpc_urls.wallet_url()],
        });
        if let Some(urls) = self.block_explorer_urls() {
            params["blockExplorerUrls"] = Value::from(urls);
        }
        params
    }
}

/// The ordered list of chains a connector supports.
///
/// Never empty: constructing from an empty list yields
/// [`known::mainnet`] alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainList {
    chains: Vec<Chain>,
}

impl ChainList {
    /// Create a chain list, substituting mainnet for an empty input.
    #[must_use]
    pub fn new(chains: Vec<Chain>) -> Self {
        if chains.is_empty() {
            Self {
                chains: vec![known::mainnet()],
            }
        } else {
            Self { chains }
        }
    }

    /// The first configured chain.
    #[must_use]
    pub fn first(&self) -> &Chain {
        // Non-empty by construction.
        &self.chains[0]
    }

    /// Look up a chain by id.
    #[must_use]
    pub fn find(&self, chain_id: u64) -> Option<&Chain> {
        self.chains.iter().find(|chain| chain.id == chain_id)
    }

    /// Look up a chain by id, failing with `ChainNotConfigured`.
    pub fn get(&self, chain_id: u64) -> Result<&Chain> {
        self.find(chain_id)
            .ok_or(ConnectorError::chain_not_configured(chain_id))
    }

    /// Whether the chain id is part of this list.
    #[must_use]
    pub fn contains(&self, chain_id: u64) -> bool {
        self.find(chain_id).is_some()
    }

    /// Iterate over the configured chains in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }

    /// Number of configured chains.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.chains.len()
    }

    /// Always `false`; kept for API symmetry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl From<Vec<Chain>> for ChainList {
    fn from(chains: Vec<Chain>) -> Self {
        Self::new(chains)
    }
}

impl<'a> IntoIterator for &'a ChainList {
    type Item = &'a Chain;
    type IntoIter = std::slice::Iter<'a, Chain>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Normalize a chain id reported by a provider.
///
/// Accepts JSON numbers, hex strings (`"0x89"`) and decimal strings (`"137"`).
pub fn normalize_chain_id(value: &Value) -> Result<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ConnectorError::InvalidChainId(n.to_string())),
        Value::String(s) => parse_chain_id(s),
        other => Err(ConnectorError::InvalidChainId(other.to_string())),
    }
}

/// Parse a chain id from a hex (`0x`-prefixed) or decimal string.
pub fn parse_chain_id(s: &str) -> Result<u64> {
    let trimmed = s.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|_| ConnectorError::InvalidChainId(s.to_string()))
}

/// Minimal `0x`-prefixed hex encoding of a chain id (`137` -> `"0x89"`).
#[must_use]
pub fn hex_value(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}
