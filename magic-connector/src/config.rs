//! Connector configuration.
//!
//! [`ConnectorOptions`] is fixed at construction and can be loaded from the
//! same camelCase JSON a web host would pass. [`ConnectConfig`] carries the
//! per-call parameters of `connect`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConnectorError, Result};
use crate::sdk::OAuthProvider;

/// Keys of the SDK constructor options owned by the connector.
const RESERVED_SDK_KEYS: [&str; 2] = ["network", "extensions"];

/// SDK tuning options forwarded on construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkOptions {
    /// Accent colour of the SDK's embedded UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    /// Dark mode for the embedded UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dark_mode: Option<bool>,
    /// Logo URL shown in the embedded UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_logo: Option<String>,
    /// Header text shown in the embedded UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_header_text: Option<String>,
    /// Any other SDK option (locale, endpoint, test mode, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub additional_magic_options: Map<String, Value>,
}

impl SdkOptions {
    /// Flattened JSON form: UI fields plus passthrough options.
    ///
    /// Passthrough keys reserved by the connector (`network`, `extensions`)
    /// are dropped.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object: Map<String, Value> = self
            .additional_magic_options
            .iter()
            .filter(|(key, _)| !RESERVED_SDK_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if let Some(ref color) = self.accent_color {
            object.insert("accentColor".into(), Value::from(color.as_str()));
        }
        if let Some(dark) = self.is_dark_mode {
            object.insert("isDarkMode".into(), Value::from(dark));
        }
        if let Some(ref logo) = self.custom_logo {
            object.insert("customLogo".into(), Value::from(logo.as_str()));
        }
        if let Some(ref text) = self.custom_header_text {
            object.insert("customHeaderText".into(), Value::from(text.as_str()));
        }
        Value::Object(object)
    }
}

/// Defaults for the OAuth login strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthOptions {
    /// Social provider used for every connect; wins over the per-call value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<OAuthProvider>,
    /// Redirect URI used when a connect call does not supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_redirect_uri: Option<String>,
}

/// Options fixed at connector construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorOptions {
    /// Publishable API key forwarded to the SDK.
    pub api_key: String,
    /// Preferred chain id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// SDK tuning options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_options: Option<SdkOptions>,
    /// OAuth defaults (read by the OAuth strategy only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_options: Option<OAuthOptions>,
}

impl ConnectorOptions {
    /// Create options with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Parse options from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ConnectorError::config("apiKey is required"));
        }
        Ok(())
    }

    /// Set the preferred chain id.
    #[must_use]
    pub const fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Set the SDK tuning options.
    #[must_use]
    pub fn with_sdk_options(mut self, options: SdkOptions) -> Self {
        self.additional_options = Some(options);
        self
    }

    /// Set the OAuth defaults.
    #[must_use]
    pub fn with_oauth_options(mut self, options: OAuthOptions) -> Self {
        self.oauth_options = Some(options);
        self
    }
}

/// Per-call parameters of `connect`.
///
/// The session strategy only reads `chain_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectConfig {
    /// Chain to end up on.
    pub chain_id: Option<u64>,
    /// Email for an email-link login.
    pub email: Option<String>,
    /// Social provider for a redirect login.
    pub provider: Option<OAuthProvider>,
    /// Redirect URI for either login.
    pub redirect_uri: Option<String>,
    /// Whether the SDK shows its pending email-link UI.
    pub show_ui: Option<bool>,
}

impl ConnectConfig {
    /// Empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a chain.
    #[must_use]
    pub const fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Log in with an email link.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Log in with a social provider.
    #[must_use]
    pub const fn with_provider(mut self, provider: OAuthProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Show or hide the SDK's email-link UI.
    #[must_use]
    pub const fn with_show_ui(mut self, show_ui: bool) -> Self {
        self.show_ui = Some(show_ui);
        self
    }
}
