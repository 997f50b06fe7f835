//! Wallet-picker descriptors.
//!
//! Each function turns a [`WalletConfig`] into a [`WalletDescriptor`]: the
//! id, name and icon shown in a wallet-selection UI plus a factory for the
//! matching [`Connector`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::chain::Chain;
use crate::config::ConnectorOptions;
use crate::connector::Connector;
use crate::error::Result;
use crate::sdk::SharedSdkFactory;

/// Icon shown when none is configured.
pub const DEFAULT_ICON_URL: &str = "https://svgshare.com/i/iJK.svg";
/// Icon background used when none is configured.
pub const DEFAULT_ICON_BACKGROUND: &str = "#fff";
/// Display name used when none is configured.
pub const DEFAULT_WALLET_NAME: &str = "Magic";

/// Input of the wallet-picker functions.
#[derive(Clone)]
pub struct WalletConfig {
    /// API key forwarded to the SDK.
    pub api_key: String,
    /// Supported chains.
    pub chains: Vec<Chain>,
    /// Entry id override.
    pub id: Option<String>,
    /// Display name override.
    pub name: Option<String>,
    /// Icon URL override.
    pub icon_url: Option<String>,
    /// Icon background override.
    pub icon_background: Option<String>,
    /// Connector options; `api_key` here is replaced by [`WalletConfig::api_key`].
    pub connector_options: Option<ConnectorOptions>,
    /// Builds the SDK for created connectors.
    pub sdk_factory: SharedSdkFactory,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("chains", &self.chains.len())
            .field("id", &self.id)
            .field("name", &self.name)
            .field("icon_url", &self.icon_url)
            .field("icon_background", &self.icon_background)
            .finish_non_exhaustive()
    }
}

impl WalletConfig {
    /// Create a config with the required fields.
    #[must_use]
    pub fn new(api_key: impl Into<String>, chains: Vec<Chain>, sdk_factory: SharedSdkFactory) -> Self {
        Self {
            api_key: api_key.into(),
            chains,
            id: None,
            name: None,
            icon_url: None,
            icon_background: None,
            connector_options: None,
            sdk_factory,
        }
    }

    /// Override the entry id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Override the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the icon and its background.
    #[must_use]
    pub fn with_icon(mut self, url: impl Into<String>, background: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self.icon_background = Some(background.into());
        self
    }

    /// Set the connector options.
    #[must_use]
    pub fn with_connector_options(mut self, options: ConnectorOptions) -> Self {
        self.connector_options = Some(options);
        self
    }

    fn options(&self) -> ConnectorOptions {
        let mut options = self.connector_options.clone().unwrap_or_default();
        options.api_key.clone_from(&self.api_key);
        options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalletKind {
    Legacy,
    Session,
    OAuth,
}

/// Connector produced by [`WalletDescriptor::create_connector`].
#[derive(Debug)]
pub struct CreatedConnector {
    /// The new connector.
    pub connector: Connector,
}

/// Entry for a wallet-selection UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDescriptor {
    /// Entry id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon URL.
    pub icon_url: String,
    /// Icon background colour.
    pub icon_background: String,
    #[serde(skip)]
    kind: WalletKind,
    #[serde(skip)]
    config: WalletConfig,
}

impl WalletDescriptor {
    fn new(kind: WalletKind, default_id: &str, config: WalletConfig) -> Self {
        Self {
            id: config.id.clone().unwrap_or_else(|| default_id.to_string()),
            name: config
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_WALLET_NAME.to_string()),
            icon_url: config
                .icon_url
                .clone()
                .unwrap_or_else(|| DEFAULT_ICON_URL.to_string()),
            icon_background: config
                .icon_background
                .clone()
                .unwrap_or_else(|| DEFAULT_ICON_BACKGROUND.to_string()),
            kind,
            config,
        }
    }

    /// Build a fresh connector for this entry.
    pub fn create_connector(&self) -> Result<CreatedConnector> {
        let mut builder = Connector::builder()
            .chains(self.config.chains.clone())
            .options(self.config.options())
            .shared_sdk_factory(Arc::clone(&self.config.sdk_factory));

        // The legacy entry keeps the connector's own identity.
        if self.kind != WalletKind::Legacy {
            if let Some(id) = &self.config.id {
                builder = builder.id(id.clone());
            }
            if let Some(name) = &self.config.name {
                builder = builder.name(name.clone());
            }
        }

        let connector = match self.kind {
            WalletKind::Legacy => builder.build_legacy()?,
            WalletKind::Session => builder.build_session()?,
            WalletKind::OAuth => builder.build_oauth()?,
        };
        Ok(CreatedConnector { connector })
    }
}

/// Entry for the legacy single connector (`magic`).
#[must_use]
pub fn magic_wallet(config: WalletConfig) -> WalletDescriptor {
    WalletDescriptor::new(WalletKind::Legacy, "magic", config)
}

/// Entry for the session-login connector (`magic-connect`).
#[must_use]
pub fn magic_connect_wallet(config: WalletConfig) -> WalletDescriptor {
    WalletDescriptor::new(WalletKind::Session, "magic-connect", config)
}

/// Entry for the OAuth connector (`magic-oauth`).
#[must_use]
pub fn magic_oauth_wallet(config: WalletConfig) -> WalletDescriptor {
    WalletDescriptor::new(WalletKind::OAuth, "magic-oauth", config)
}
