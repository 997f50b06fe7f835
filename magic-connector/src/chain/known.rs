//! Built-in descriptors for well-known EVM networks.

use std::collections::BTreeMap;

use super::{BlockExplorer, BlockExplorers, Chain, NativeCurrency, RpcUrls};

fn explorer(name: &str, url: &str) -> Option<BlockExplorers> {
    Some(BlockExplorers {
        default: BlockExplorer {
            name: name.into(),
            url: url.into(),
        },
        others: BTreeMap::new(),
    })
}

fn ether(name: &str) -> NativeCurrency {
    NativeCurrency::new(name, "ETH", 18)
}

/// Ethereum mainnet (chain id 1). The default when no chains are configured.
#[must_use]
pub fn mainnet() -> Chain {
    Chain {
        id: 1,
        name: "Ethereum".into(),
        network: "homestead".into(),
        native_currency: ether("Ether"),
        rpc_urls: RpcUrls {
            default: "https://cloudflare-eth.com".into(),
            public: None,
        },
        block_explorers: explorer("Etherscan", "https://etherscan.io"),
        testnet: false,
    }
}

/// Goerli testnet (chain id 5).
#[must_use]
pub fn goerli() -> Chain {
    Chain {
        id: 5,
        name: "Goerli".into(),
        network: "goerli".into(),
        native_currency: ether("Goerli Ether"),
        rpc_urls: RpcUrls {
            default: "https://rpc.ankr.com/eth_goerli".into(),
            public: None,
        },
        block_explorers: explorer("Etherscan", "https://goerli.etherscan.io"),
        testnet: true,
    }
}

/// Sepolia testnet (chain id 11155111).
#[must_use]
pub fn sepolia() -> Chain {
    Chain {
        id: 11_155_111,
        name: "Sepolia".into(),
        network: "sepolia".into(),
        native_currency: ether("Sepolia Ether"),
        rpc_urls: RpcUrls {
            default: "https://rpc.sepolia.org".into(),
            public: None,
        },
        block_explorers: explorer("Etherscan", "https://sepolia.etherscan.io"),
        testnet: true,
    }
}

/// Polygon PoS (chain id 137).
#[must_use]
pub fn polygon() -> Chain {
    Chain {
        id: 137,
        name: "Polygon".into(),
        network: "matic".into(),
        native_currency: NativeCurrency::new("MATIC", "MATIC", 18),
        rpc_urls: RpcUrls {
            default: "https://polygon-rpc.com".into(),
            public: None,
        },
        block_explorers: explorer("PolygonScan", "https://polygonscan.com"),
        testnet: false,
    }
}

/// Polygon Mumbai testnet (chain id 80001).
#[must_use]
pub fn polygon_mumbai() -> Chain {
    Chain {
        id: 80_001,
        name: "Polygon Mumbai".into(),
        network: "maticmum".into(),
        native_currency: NativeCurrency::new("MATIC", "MATIC", 18),
        rpc_urls: RpcUrls {
            default: "https://matic-mumbai.chainstacklabs.com".into(),
            public: None,
        },
        block_explorers: explorer("PolygonScan", "https://mumbai.polygonscan.com"),
        testnet: true,
    }
}

/// OP Mainnet (chain id 10).
#[must_use]
pub fn optimism() -> Chain {
    Chain {
        id: 10,
        name: "Optimism".into(),
        network: "optimism".into(),
        native_currency: ether("Ether"),
        rpc_urls: RpcUrls {
            default: "https://mainnet.optimism.io".into(),
            public: None,
        },
        block_explorers: explorer("Etherscan", "https://optimistic.etherscan.io"),
        testnet: false,
    }
}

/// Arbitrum One (chain id 42161).
#[must_use]
pub fn arbitrum() -> Chain {
    Chain {
        id: 42_161,
        name: "Arbitrum One".into(),
        network: "arbitrum".into(),
        native_currency: ether("Ether"),
        rpc_urls: RpcUrls {
            default: "https://arb1.arbitrum.io/rpc".into(),
            public: None,
        },
        block_explorers: explorer("Arbiscan", "https://arbiscan.io"),
        testnet: false,
    }
}

/// All built-in chains, mainnet first.
#[must_use]
pub fn all() -> Vec<Chain> {
    vec![
        mainnet(),
        goerli(),
        sepolia(),
        polygon(),
        polygon_mumbai(),
        optimism(),
        arbitrum(),
    ]
}

/// Look up a built-in chain by id.
#[must_use]
pub fn by_id(chain_id: u64) -> Option<Chain> {
    all().into_iter().find(|chain| chain.id == chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids_are_unique() {
        let chains = all();
        for (i, a) in chains.iter().enumerate() {
            for b in &chains[i + 1..] {
                assert_ne!(a.id, b.id, "{} and {} share an id", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_by_id() {
        assert_eq!(by_id(137).map(|c| c.name), Some("Polygon".to_string()));
        assert!(by_id(999_999).is_none());
    }
}
