//! Wallet SDK collaborator interfaces.
//!
//! The wallet SDK owns the session: it authenticates the user (email link,
//! social OAuth, or its own embedded UI), stores credentials and exposes an
//! RPC-capable provider. The connector only needs the small surface in
//! [`WalletSdk`], and builds instances through an [`SdkFactory`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SdkOptions;
use crate::error::{ConnectorError, Result};
use crate::provider::SharedRpcProvider;

/// SDK extension required by a login strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    /// Session extension: login through the SDK's embedded UI.
    Connect,
    /// OAuth extension: social login by redirect plus email links.
    OAuth,
}

impl Extension {
    /// Extension name as registered with the SDK.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::OAuth => "oauth",
        }
    }
}

/// Social login providers supported by the OAuth extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum OAuthProvider {
    Google,
    Facebook,
    Apple,
    Github,
    Bitbucket,
    Gitlab,
    Linkedin,
    Twitter,
    Discord,
    Twitch,
    Microsoft,
}

impl OAuthProvider {
    /// Provider identifier understood by the SDK.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
            Self::Apple => "apple",
            Self::Github => "github",
            Self::Bitbucket => "bitbucket",
            Self::Gitlab => "gitlab",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Discord => "discord",
            Self::Twitch => "twitch",
            Self::Microsoft => "microsoft",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(Value::String(s.to_ascii_lowercase()))
            .map_err(|_| ConnectorError::config(format!("unknown OAuth provider '{s}'")))
    }
}

/// Network the SDK instance is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// RPC endpoint.
    pub rpc_url: String,
    /// Chain id.
    pub chain_id: u64,
}

/// Everything needed to construct a wallet SDK instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SdkConfig {
    /// Publishable API key, forwarded as-is.
    pub api_key: String,
    /// Network to bind to.
    pub network: NetworkConfig,
    /// Extensions to load.
    pub extensions: Vec<Extension>,
    /// Passthrough tuning options.
    pub options: SdkOptions,
}

impl SdkConfig {
    /// The SDK's constructor options as JSON:
    /// `{ network, extensions, ...options }`.
    ///
    /// `network` and `extensions` are owned by the connector and win over
    /// same-named passthrough keys.
    #[must_use]
    pub fn options_value(&self) -> Value {
        let mut object = Map::new();
        if let Value::Object(options) = self.options.to_value() {
            object.extend(options);
        }
        object.insert(
            "network".into(),
            serde_json::json!({
                "rpcUrl": self.network.rpc_url,
                "chainId": self.network.chain_id,
            }),
        );
        object.insert(
            "extensions".into(),
            self.extensions.iter().map(|e| e.name()).collect(),
        );
        Value::Object(object)
    }
}

/// Email-link login request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MagicLinkRequest {
    /// Address the login link is sent to.
    pub email: String,
    /// Where the link lands after confirmation.
    pub redirect_uri: Option<String>,
    /// Whether the SDK shows its pending-login UI.
    pub show_ui: Option<bool>,
}

/// Social login by redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectLoginRequest {
    /// Social provider.
    pub provider: OAuthProvider,
    /// Where the provider redirects back to.
    pub redirect_uri: String,
}

/// A constructed wallet SDK instance.
///
/// Extension-specific methods default to an error so SDKs only implement
/// the namespaces they load.
#[async_trait]
pub trait WalletSdk: Send + Sync {
    /// The SDK's raw RPC provider.
    fn rpc_provider(&self) -> SharedRpcProvider;

    /// Whether a user session is active.
    async fn is_logged_in(&self) -> Result<bool>;

    /// End the user session.
    async fn logout(&self) -> Result<bool>;

    /// End the session-extension session (`connect.disconnect`).
    async fn end_session(&self) -> Result<()> {
        Err(ConnectorError::sdk("connect extension is not loaded"))
    }

    /// Start a social login by redirect (`oauth.loginWithRedirect`).
    async fn login_with_redirect(&self, request: RedirectLoginRequest) -> Result<()> {
        let _ = request;
        Err(ConnectorError::sdk("oauth extension is not loaded"))
    }

    /// Log in with an email link (`auth.loginWithMagicLink`).
    ///
    /// Returns the SDK's identity token when it provides one.
    async fn login_with_magic_link(&self, request: MagicLinkRequest) -> Result<Option<String>> {
        let _ = request;
        Err(ConnectorError::sdk("auth module is not available"))
    }
}

/// A shared, type-erased SDK instance.
pub type SharedWalletSdk = Arc<dyn WalletSdk>;

/// Builds SDK instances from an [`SdkConfig`].
pub trait SdkFactory: Send + Sync {
    /// Construct a new SDK instance.
    fn create(&self, config: SdkConfig) -> Result<SharedWalletSdk>;
}

impl<F> SdkFactory for F
where
    F: Fn(SdkConfig) -> Result<SharedWalletSdk> + Send + Sync,
{
    fn create(&self, config: SdkConfig) -> Result<SharedWalletSdk> {
        self(config)
    }
}

/// A shared SDK factory.
pub type SharedSdkFactory = Arc<dyn SdkFactory>;
