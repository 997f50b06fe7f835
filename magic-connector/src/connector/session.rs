//! Session login: authentication happens inside the SDK's embedded UI.

use tracing::info;

use super::base::{BaseConnector, ConnectResult};
use crate::config::ConnectConfig;
use crate::error::Result;
use crate::sdk::Extension;

/// Login strategy for the SDK's session extension.
///
/// No login branching: fetching the account during connect prompts the
/// SDK's own UI when the user is not signed in yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionLogin;

impl SessionLogin {
    /// Default connector id.
    pub const ID: &'static str = "magic-connect";
    /// Default connector name.
    pub const NAME: &'static str = "Magic Connect";
    /// Default id of the legacy single-connector setup.
    pub const LEGACY_ID: &'static str = "magic";
    /// Default name of the legacy single-connector setup.
    pub const LEGACY_NAME: &'static str = "Magic";
    /// SDK extension this strategy needs.
    pub const EXTENSION: Extension = Extension::Connect;

    pub(crate) async fn connect(
        self,
        base: &BaseConnector,
        config: &ConnectConfig,
    ) -> Result<ConnectResult> {
        base.connect(config.chain_id).await
    }

    pub(crate) async fn disconnect(self, base: &BaseConnector) -> Result<()> {
        let sdk = base.sdk(None).await?;
        sdk.end_session().await?;
        info!("wallet session ended");
        base.disconnect().await;
        Ok(())
    }
}
