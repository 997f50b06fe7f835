//! OAuth login: social login by redirect, or an email link.
//!
//! Connect flow:
//!
//! ```text
//! unauthenticated ── provider set ──> authenticating-by-redirect ──┐
//!        │                                                         ├──> authenticated
//!        └──────── email set ───────> authenticating-by-link ──────┘
//! ```
//!
//! An already authenticated session goes straight to the base handshake.
//! Configuration problems are reported before the SDK login API is called.

use tracing::{debug, info};

use super::base::{BaseConnector, ConnectResult};
use crate::config::{ConnectConfig, OAuthOptions};
use crate::error::{ConnectorError, Result};
use crate::sdk::{Extension, MagicLinkRequest, RedirectLoginRequest};

/// The login path chosen for an unauthenticated connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginMethod {
    /// Social login by redirect.
    Redirect(RedirectLoginRequest),
    /// Email-link login.
    MagicLink(MagicLinkRequest),
}

impl LoginMethod {
    /// Choose the login path for `config`.
    ///
    /// The configured default provider wins over the per-call provider.
    /// Exactly one of email and provider must be set, and a redirect login
    /// needs a redirect URI from the call or the configured default.
    pub fn resolve(config: &ConnectConfig, options: &OAuthOptions) -> Result<Self> {
        let provider = options.default_provider.or(config.provider);
        match (config.email.as_ref(), provider) {
            (None, None) => Err(ConnectorError::config(
                "Must use either social or email login",
            )),
            (Some(_), Some(_)) => Err(ConnectorError::config(
                "Must provide one of social or email",
            )),
            (None, Some(provider)) => {
                let redirect_uri = config
                    .redirect_uri
                    .clone()
                    .or_else(|| options.default_redirect_uri.clone())
                    .ok_or_else(|| {
                        ConnectorError::config("Must provide redirectUri for login with redirect")
                    })?;
                Ok(Self::Redirect(RedirectLoginRequest {
                    provider,
                    redirect_uri,
                }))
            }
            (Some(email), None) => Ok(Self::MagicLink(MagicLinkRequest {
                email: email.clone(),
                redirect_uri: config.redirect_uri.clone(),
                show_ui: config.show_ui,
            })),
        }
    }
}

/// Login strategy for the SDK's OAuth extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthLogin {
    options: OAuthOptions,
}

impl OAuthLogin {
    /// Default connector id.
    pub const ID: &'static str = "magic-oauth";
    /// Default connector name.
    pub const NAME: &'static str = "Magic OAuth";
    /// SDK extension this strategy needs.
    pub const EXTENSION: Extension = Extension::OAuth;

    /// Create the strategy with its defaults.
    #[must_use]
    pub const fn new(options: OAuthOptions) -> Self {
        Self { options }
    }

    /// The OAuth defaults.
    #[must_use]
    pub const fn options(&self) -> &OAuthOptions {
        &self.options
    }

    pub(crate) async fn connect(
        &self,
        base: &BaseConnector,
        config: &ConnectConfig,
    ) -> Result<ConnectResult> {
        let chain_id = config.chain_id;
        base.sdk(chain_id).await?;

        if self.is_authorized(base).await {
            base.emit_connecting();
            return base.connect(chain_id).await;
        }

        let method = LoginMethod::resolve(config, &self.options)?;
        base.emit_connecting();
        self.login(base, method).await?;

        base.connect(chain_id).await
    }

    async fn login(&self, base: &BaseConnector, method: LoginMethod) -> Result<()> {
        let sdk = base.sdk(None).await?;
        let outcome = match method {
            LoginMethod::Redirect(request) => {
                info!(provider = %request.provider, "starting redirect login");
                sdk.login_with_redirect(request).await
            }
            LoginMethod::MagicLink(request) => {
                info!("starting email link login");
                sdk.login_with_magic_link(request).await.map(|_| ())
            }
        };
        outcome.map_err(|error| {
            debug!(%error, "login failed");
            ConnectorError::user_rejected()
        })
    }

    /// Delegates to the SDK's session check; failures count as `false`.
    pub(crate) async fn is_authorized(&self, base: &BaseConnector) -> bool {
        let sdk = match base.sdk(None).await {
            Ok(sdk) => sdk,
            Err(error) => {
                debug!(%error, "not authorized");
                return false;
            }
        };
        match sdk.is_logged_in().await {
            Ok(logged_in) => logged_in,
            Err(error) => {
                debug!(%error, "session check failed");
                false
            }
        }
    }

    pub(crate) async fn disconnect(&self, base: &BaseConnector) -> Result<()> {
        let sdk = base.sdk(None).await?;
        sdk.logout().await?;
        info!("user logged out");
        base.disconnect().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::chain::known;
    use crate::config::ConnectorOptions;
    use crate::connector::Connector;
    use crate::events::{ConnectorEvent, ConnectorMessage};
    use crate::sdk::OAuthProvider;
    use crate::testing::{self, MockProvider, MockSdkFactory, SdkCall, TEST_ACCOUNT_CHECKSUM};

    fn oauth_connector(factory: &Arc<MockSdkFactory>, oauth: OAuthOptions) -> Connector {
        testing::builder(
            factory,
            vec![known::mainnet(), known::polygon()],
            ConnectorOptions::new("k").with_oauth_options(oauth),
        )
        .build_oauth()
        .unwrap()
    }

    #[test]
    fn test_resolve_requires_one_method() {
        let options = OAuthOptions::default();

        let err = LoginMethod::resolve(&ConnectConfig::new(), &options).unwrap_err();
        assert!(
            matches!(err, ConnectorError::Config(ref m) if m == "Must use either social or email login")
        );

        let both = ConnectConfig::new()
            .with_email("a@b.c")
            .with_provider(OAuthProvider::Google);
        let err = LoginMethod::resolve(&both, &options).unwrap_err();
        assert!(
            matches!(err, ConnectorError::Config(ref m) if m == "Must provide one of social or email")
        );
    }

    #[test]
    fn test_resolve_default_provider_wins() {
        let options = OAuthOptions {
            default_provider: Some(OAuthProvider::Apple),
            default_redirect_uri: Some("https://app.example/cb".into()),
        };
        let config = ConnectConfig::new().with_provider(OAuthProvider::Google);

        let method = LoginMethod::resolve(&config, &options).unwrap();
        assert_eq!(
            method,
            LoginMethod::Redirect(RedirectLoginRequest {
                provider: OAuthProvider::Apple,
                redirect_uri: "https://app.example/cb".into(),
            })
        );

        // A configured default provider plus a per-call email is ambiguous.
        let config = ConnectConfig::new().with_email("a@b.c");
        assert!(LoginMethod::resolve(&config, &options).is_err());
    }

    #[test]
    fn test_resolve_redirect_uri_precedence() {
        let options = OAuthOptions {
            default_provider: None,
            default_redirect_uri: Some("https://default.example".into()),
        };
        let config = ConnectConfig::new()
            .with_provider(OAuthProvider::Github)
            .with_redirect_uri("https://call.example");

        let LoginMethod::Redirect(request) = LoginMethod::resolve(&config, &options).unwrap()
        else {
            panic!("expected redirect login");
        };
        assert_eq!(request.redirect_uri, "https://call.example");
    }

    #[test]
    fn test_resolve_magic_link() {
        let config = ConnectConfig::new()
            .with_email("user@example.com")
            .with_show_ui(false);
        let method = LoginMethod::resolve(&config, &OAuthOptions::default()).unwrap();
        assert_eq!(
            method,
            LoginMethod::MagicLink(MagicLinkRequest {
                email: "user@example.com".into(),
                redirect_uri: None,
                show_ui: Some(false),
            })
        );
    }

    #[tokio::test]
    async fn test_connect_without_method_fails_before_network() {
        let provider = MockProvider::new();
        let factory = Arc::new(MockSdkFactory::new(Arc::clone(&provider)));
        let connector = oauth_connector(&factory, OAuthOptions::default());
        let mut events = connector.subscribe();

        let err = connector.connect(ConnectConfig::new()).await.unwrap_err();
        assert!(matches!(err, ConnectorError::Config(_)));

        let both = ConnectConfig::new()
            .with_email("a@b.c")
            .with_provider(OAuthProvider::Google);
        let err = connector.connect(both).await.unwrap_err();
        assert!(matches!(err, ConnectorError::Config(_)));

        assert!(provider.requests().is_empty());
        assert!(
            factory
                .sdk()
                .calls()
                .iter()
                .all(|call| *call == SdkCall::IsLoggedIn)
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_redirect_without_uri_fails_before_login() {
        let provider = MockProvider::new();
        let factory = Arc::new(MockSdkFactory::new(Arc::clone(&provider)));
        let connector = oauth_connector(&factory, OAuthOptions::default());

        let config = ConnectConfig::new().with_provider(OAuthProvider::Google);
        let err = connector.connect(config).await.unwrap_err();
        assert!(
            matches!(err, ConnectorError::Config(ref m) if m == "Must provide redirectUri for login with redirect")
        );
        assert_eq!(factory.sdk().calls(), vec![SdkCall::IsLoggedIn]);
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_login_then_connect() {
        let factory = Arc::new(MockSdkFactory::new(MockProvider::new()));
        let connector = oauth_connector(
            &factory,
            OAuthOptions {
                default_provider: Some(OAuthProvider::Google),
                default_redirect_uri: Some("https://app.example/cb".into()),
            },
        );
        let mut events = connector.subscribe();

        let result = connector.connect(ConnectConfig::new()).await.unwrap();
        assert_eq!(result.account, TEST_ACCOUNT_CHECKSUM);
        assert_eq!(result.chain.id, 1);
        assert!(!result.chain.unsupported);

        assert_eq!(
            factory.sdk().calls(),
            vec![
                SdkCall::IsLoggedIn,
                SdkCall::LoginWithRedirect(RedirectLoginRequest {
                    provider: OAuthProvider::Google,
                    redirect_uri: "https://app.example/cb".into(),
                }),
            ]
        );
        assert_eq!(
            events.try_recv().unwrap(),
            ConnectorEvent::Message(ConnectorMessage::Connecting)
        );
        // The base handshake does not emit a second connecting message.
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_magic_link_login() {
        let factory = Arc::new(MockSdkFactory::new(MockProvider::new()));
        let connector = oauth_connector(&factory, OAuthOptions::default());

        let config = ConnectConfig::new()
            .with_email("user@example.com")
            .with_redirect_uri("https://app.example/confirm")
            .with_show_ui(true);
        let result = connector.connect(config).await.unwrap();
        assert_eq!(result.account, TEST_ACCOUNT_CHECKSUM);

        assert_eq!(
            factory.sdk().calls()[1],
            SdkCall::LoginWithMagicLink(MagicLinkRequest {
                email: "user@example.com".into(),
                redirect_uri: Some("https://app.example/confirm".into()),
                show_ui: Some(true),
            })
        );
    }

    #[tokio::test]
    async fn test_rejected_login_is_user_rejected() {
        let provider = MockProvider::new();
        let factory = Arc::new(MockSdkFactory::new(Arc::clone(&provider)).rejecting_logins());
        let connector = oauth_connector(&factory, OAuthOptions::default());

        let err = connector
            .connect(ConnectConfig::new().with_email("user@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_user_rejected());
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_authorized_session_skips_login() {
        let factory = Arc::new(MockSdkFactory::new(MockProvider::new()).logged_in());
        let connector = oauth_connector(&factory, OAuthOptions::default());

        let result = connector.connect(ConnectConfig::new()).await.unwrap();
        assert_eq!(result.account, TEST_ACCOUNT_CHECKSUM);
        assert_eq!(factory.sdk().calls(), vec![SdkCall::IsLoggedIn]);
    }

    #[tokio::test]
    async fn test_is_authorized_swallows_sdk_failures() {
        let factory = Arc::new(
            MockSdkFactory::new(MockProvider::new())
                .logged_in()
                .failing_session_check(),
        );
        let connector = oauth_connector(&factory, OAuthOptions::default());
        assert!(!connector.is_authorized().await);
    }

    #[tokio::test]
    async fn test_disconnect_logs_out() {
        let factory = Arc::new(MockSdkFactory::new(MockProvider::new()).logged_in());
        let connector = oauth_connector(&factory, OAuthOptions::default());

        connector.connect(ConnectConfig::new()).await.unwrap();
        assert!(connector.is_authorized().await);

        connector.disconnect().await.unwrap();
        connector.disconnect().await.unwrap();
        assert!(!connector.is_authorized().await);
        assert_eq!(
            factory
                .sdk()
                .calls()
                .iter()
                .filter(|call| **call == SdkCall::Logout)
                .count(),
            2
        );
    }
}
