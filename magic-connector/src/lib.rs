//! Magic Connector - A wallet connector backed by a passwordless-wallet SDK.
//!
//! This crate adapts a wallet SDK (email links, social OAuth, or the SDK's
//! own embedded UI) to the connector contract used by Ethereum dApp tooling.
//!
//! # Architecture
//!
//! - **Connector** ([`connector`]) - Connect, authorize and switch-chain handshake
//! - **Chains** ([`chain`]) - Chain descriptors and built-in networks
//! - **Provider** ([`provider`]) - Injected-provider surface and its wrapper
//! - **SDK** ([`sdk`]) - Wallet SDK interfaces the host implements
//! - **Events** ([`events`]) - Lifecycle events over a broadcast channel
//! - **Wallet** ([`wallet`]) - Wallet-picker descriptors
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use magic_connector::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let connector = Connector::builder()
//!         .chains(vec![known::mainnet(), known::polygon()])
//!         .options(ConnectorOptions::new("pk_live_..."))
//!         .sdk_factory(|config: SdkConfig| my_sdk(config))
//!         .build_session()?;
//!
//!     let mut events = connector.subscribe();
//!     let result = connector.connect(ConnectConfig::new()).await?;
//!     println!("connected {} on chain {}", result.account, result.chain.id);
//!
//!     connector.switch_chain(137).await?;
//!     connector.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod chain;
pub mod config;
pub mod connector;
pub mod error;
pub mod events;
pub mod provider;
pub mod sdk;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use connector::{Connector, ConnectorBuilder};
pub use error::{ConnectorError, Result, RpcError};

/// Prelude module for convenient imports.
pub mod prelude {
    // Errors
    pub use crate::error::{ConnectorError, Result, RpcError};

    // Chains
    pub use crate::chain::{Chain, ChainList, NativeCurrency, RpcUrls, known};

    // Config
    pub use crate::config::{ConnectConfig, ConnectorOptions, OAuthOptions, SdkOptions};

    // Connector
    pub use crate::connector::{
        ConnectResult, Connector, ConnectorBuilder, Environment, Login, LoginMethod, OAuthLogin,
        SessionLogin,
    };

    // Events
    pub use crate::events::{ChainStatus, ConnectorEvent, ConnectorMessage};

    // Provider
    pub use crate::provider::{
        JsonRpcSigner, ProviderEvent, ProviderEventKind, RpcProvider, Web3Provider,
    };

    // SDK
    pub use crate::sdk::{
        Extension, MagicLinkRequest, NetworkConfig, OAuthProvider, RedirectLoginRequest,
        SdkConfig, SdkFactory, WalletSdk,
    };

    // Wallet picker
    pub use crate::wallet::{
        WalletConfig, WalletDescriptor, magic_connect_wallet, magic_oauth_wallet, magic_wallet,
    };
}
