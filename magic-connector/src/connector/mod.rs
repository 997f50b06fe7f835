//! The connector exposed to the host framework.
//!
//! # Architecture
//!
//! ```text
//! Connector
//!   ├── login: Login          → Session(SessionLogin) | OAuth(OAuthLogin)
//!   └── base: BaseConnector   → SDK + provider cache, chain logic, events
//! ```
//!
//! Each login strategy wraps authentication around the shared handshake in
//! [`BaseConnector`]; dispatch is a `match` on [`Login`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use magic_connector::prelude::*;
//!
//! let connector = Connector::builder()
//!     .chains(vec![known::mainnet(), known::polygon()])
//!     .options(ConnectorOptions::new("pk_live_...").with_chain_id(1))
//!     .sdk_factory(my_sdk_factory)
//!     .build_oauth()?;
//!
//! let result = connector
//!     .connect(ConnectConfig::new().with_email("user@example.com"))
//!     .await?;
//! println!("{} on chain {}", result.account, result.chain.id);
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::chain::{Chain, ChainList};
use crate::config::{ConnectConfig, ConnectorOptions};
use crate::error::{ConnectorError, Result};
use crate::events::{ConnectorEvent, EventEmitter};
use crate::provider::{JsonRpcSigner, Web3Provider};
use crate::sdk::{Extension, SdkFactory, SharedSdkFactory, SharedWalletSdk};

mod base;
mod oauth;
mod session;

pub use base::{BaseConnector, ConnectResult};
pub use oauth::{LoginMethod, OAuthLogin};
pub use session::SessionLogin;

/// Login strategy of a connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Login {
    /// The SDK's embedded UI handles authentication.
    Session(SessionLogin),
    /// Social login by redirect, or an email link.
    OAuth(OAuthLogin),
}

impl Login {
    /// SDK extension the strategy needs.
    #[must_use]
    pub const fn extension(&self) -> Extension {
        match self {
            Self::Session(_) => SessionLogin::EXTENSION,
            Self::OAuth(_) => OAuthLogin::EXTENSION,
        }
    }

    /// Whether the base handshake emits the `connecting` message itself.
    ///
    /// OAuth emits it once a login path has been chosen.
    #[must_use]
    pub const fn emits_connecting(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}

/// Runtime environment of the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// A browser, where the SDK can show its UI.
    Browser,
    /// A server or other headless environment.
    Server,
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Browser
        } else {
            Self::Server
        }
    }
}

/// Wallet connector backed by a wallet SDK.
pub struct Connector {
    id: String,
    name: String,
    environment: Environment,
    login: Login,
    base: BaseConnector,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("environment", &self.environment)
            .field("login", &self.login)
            .field("base", &self.base)
            .finish()
    }
}

impl Connector {
    /// Create a builder for a [`Connector`].
    #[must_use]
    pub fn builder() -> ConnectorBuilder {
        ConnectorBuilder::default()
    }

    /// Connector id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` unless running outside a browser.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.environment == Environment::Browser
    }

    /// The login strategy.
    #[must_use]
    pub const fn login(&self) -> &Login {
        &self.login
    }

    /// The shared handshake state.
    #[must_use]
    pub const fn base(&self) -> &BaseConnector {
        &self.base
    }

    /// The configured chains (never empty).
    #[must_use]
    pub fn chains(&self) -> &ChainList {
        self.base.chains()
    }

    /// The construction options.
    #[must_use]
    pub const fn options(&self) -> &ConnectorOptions {
        self.base.options()
    }

    /// Subscribe to `message`, `change` and `disconnect` events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        self.base.subscribe()
    }

    /// Authenticate if needed, then connect.
    pub async fn connect(&self, config: ConnectConfig) -> Result<ConnectResult> {
        debug!(connector = %self.id, chain_id = ?config.chain_id, "connect requested");
        match &self.login {
            Login::Session(login) => login.connect(&self.base, &config).await,
            Login::OAuth(login) => login.connect(&self.base, &config).await,
        }
    }

    /// End the session and release provider listeners.
    pub async fn disconnect(&self) -> Result<()> {
        debug!(connector = %self.id, "disconnect requested");
        match &self.login {
            Login::Session(login) => login.disconnect(&self.base).await,
            Login::OAuth(login) => login.disconnect(&self.base).await,
        }
    }

    /// Checksummed address of the authenticated account.
    pub async fn account(&self) -> Result<String> {
        self.base.account().await
    }

    /// The cached provider wrapper.
    pub async fn provider(&self, chain_id: Option<u64>) -> Result<Arc<Web3Provider>> {
        self.base.provider(chain_id).await
    }

    /// A signer bound to the cached provider.
    pub async fn signer(&self) -> Result<JsonRpcSigner> {
        self.base.signer().await
    }

    /// Whether a session is established. Never fails.
    pub async fn is_authorized(&self) -> bool {
        match &self.login {
            Login::Session(_) => self.base.is_authorized().await,
            Login::OAuth(login) => login.is_authorized(&self.base).await,
        }
    }

    /// The current chain id.
    pub fn chain_id(&self) -> Result<u64> {
        self.base.chain_id()
    }

    /// Switch the wallet to a configured chain.
    pub async fn switch_chain(&self, chain_id: u64) -> Result<Chain> {
        self.base.switch_chain(chain_id).await
    }

    /// The cached SDK instance.
    pub async fn sdk(&self, chain_id: Option<u64>) -> Result<SharedWalletSdk> {
        self.base.sdk(chain_id).await
    }

    /// Whether the chain id is missing from the configured chains.
    #[must_use]
    pub fn is_chain_unsupported(&self, chain_id: u64) -> bool {
        self.base.is_chain_unsupported(chain_id)
    }
}

/// Builder for constructing a [`Connector`].
///
/// `options` and an SDK factory are required.
#[derive(Default)]
pub struct ConnectorBuilder {
    chains: Vec<Chain>,
    options: Option<ConnectorOptions>,
    id: Option<String>,
    name: Option<String>,
    environment: Option<Environment>,
    sdk_factory: Option<SharedSdkFactory>,
    event_capacity: Option<usize>,
}

impl std::fmt::Debug for ConnectorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorBuilder")
            .field("chains", &self.chains.len())
            .field("id", &self.id)
            .field("name", &self.name)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl ConnectorBuilder {
    /// Set the supported chains. An empty list means mainnet only.
    #[must_use]
    pub fn chains(mut self, chains: Vec<Chain>) -> Self {
        self.chains = chains;
        self
    }

    /// Add a supported chain.
    #[must_use]
    pub fn chain(mut self, chain: Chain) -> Self {
        self.chains.push(chain);
        self
    }

    /// Set the connector options.
    #[must_use]
    pub fn options(mut self, options: ConnectorOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Override the connector id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Override the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the detected environment.
    #[must_use]
    pub const fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the SDK factory.
    #[must_use]
    pub fn sdk_factory(self, factory: impl SdkFactory + 'static) -> Self {
        self.shared_sdk_factory(Arc::new(factory))
    }

    /// Set an already shared SDK factory.
    #[must_use]
    pub fn shared_sdk_factory(mut self, factory: SharedSdkFactory) -> Self {
        self.sdk_factory = Some(factory);
        self
    }

    /// Set the capacity of the event channel.
    ///
    /// Building fails with [`ConnectorError::Config`] when `capacity` is zero.
    #[must_use]
    pub const fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Build a session-login connector (`magic-connect`).
    pub fn build_session(self) -> Result<Connector> {
        self.build(
            Login::Session(SessionLogin),
            SessionLogin::ID,
            SessionLogin::NAME,
        )
    }

    /// Build the legacy single connector (`magic`), a session login.
    pub fn build_legacy(self) -> Result<Connector> {
        self.build(
            Login::Session(SessionLogin),
            SessionLogin::LEGACY_ID,
            SessionLogin::LEGACY_NAME,
        )
    }

    /// Build an OAuth connector (`magic-oauth`).
    ///
    /// OAuth defaults come from `options.oauth_options`.
    pub fn build_oauth(self) -> Result<Connector> {
        let oauth = self
            .options
            .as_ref()
            .and_then(|options| options.oauth_options.clone())
            .unwrap_or_default();
        self.build(
            Login::OAuth(OAuthLogin::new(oauth)),
            OAuthLogin::ID,
            OAuthLogin::NAME,
        )
    }

    fn build(self, login: Login, default_id: &str, default_name: &str) -> Result<Connector> {
        let options = self
            .options
            .ok_or_else(|| ConnectorError::config("connector options are required"))?;
        options.validate()?;
        let factory = self
            .sdk_factory
            .ok_or_else(|| ConnectorError::config("an SDK factory is required"))?;

        let emitter = match self.event_capacity {
            Some(0) => return Err(ConnectorError::config("event capacity must be non-zero")),
            Some(capacity) => EventEmitter::with_capacity(capacity),
            None => EventEmitter::new(),
        };
        let base = BaseConnector::new(
            ChainList::new(self.chains),
            options,
            login.extension(),
            login.emits_connecting(),
            factory,
            emitter,
        );

        let connector = Connector {
            id: self.id.unwrap_or_else(|| default_id.to_string()),
            name: self.name.unwrap_or_else(|| default_name.to_string()),
            environment: self.environment.unwrap_or_default(),
            login,
            base,
        };
        debug!(connector = %connector.id, chains = connector.chains().len(), "connector created");
        Ok(connector)
    }
}
