//! The handshake shared by every login strategy.
//!
//! [`BaseConnector`] owns the lazily built SDK instance and provider
//! wrapper, the provider event subscriptions, and the chain resolution and
//! switching logic. Login strategies layer authentication around it.

use std::sync::{Arc, Weak};

use serde_json::{Value, json};
use tokio::sync::{Mutex, OnceCell, broadcast};
use tracing::{debug, info, warn};

use crate::chain::{Chain, ChainList, hex_value, normalize_chain_id};
use crate::config::ConnectorOptions;
use crate::error::{ConnectorError, Result};
use crate::events::{ChainStatus, ConnectorEvent, ConnectorMessage, EventEmitter};
use crate::provider::{
    EventListener, JsonRpcSigner, ListenerId, ProviderEvent, ProviderEventKind, Web3Provider,
    checksum_address,
};
use crate::sdk::{Extension, NetworkConfig, SdkConfig, SharedSdkFactory, SharedWalletSdk};

/// Outcome of a successful connect.
#[derive(Debug, Clone)]
pub struct ConnectResult {
    /// Checksummed account address.
    pub account: String,
    /// Chain the wallet ended up on.
    pub chain: ChainStatus,
    /// The connector's provider wrapper.
    pub provider: Arc<Web3Provider>,
}

/// Listeners registered on the provider by `connect`.
struct Subscriptions {
    provider: Arc<Web3Provider>,
    ids: Vec<(ProviderEventKind, ListenerId)>,
}

/// Generic wallet-SDK-backed connector state.
pub struct BaseConnector {
    chains: Arc<ChainList>,
    options: ConnectorOptions,
    extension: Extension,
    emit_connecting: bool,
    factory: SharedSdkFactory,
    emitter: EventEmitter,
    sdk: OnceCell<SharedWalletSdk>,
    provider: OnceCell<Arc<Web3Provider>>,
    subscriptions: Mutex<Option<Subscriptions>>,
}

impl std::fmt::Debug for BaseConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseConnector")
            .field("chains", &self.chains.len())
            .field("chain_id", &self.options.chain_id)
            .field("extension", &self.extension)
            .field("sdk_initialized", &self.sdk.initialized())
            .field("provider", &self.provider.get())
            .finish_non_exhaustive()
    }
}

impl BaseConnector {
    pub(crate) fn new(
        chains: ChainList,
        options: ConnectorOptions,
        extension: Extension,
        emit_connecting: bool,
        factory: SharedSdkFactory,
        emitter: EventEmitter,
    ) -> Self {
        Self {
            chains: Arc::new(chains),
            options,
            extension,
            emit_connecting,
            factory,
            emitter,
            sdk: OnceCell::new(),
            provider: OnceCell::new(),
            subscriptions: Mutex::new(None),
        }
    }

    /// The configured chains (never empty).
    #[must_use]
    pub fn chains(&self) -> &ChainList {
        &self.chains
    }

    /// The construction options.
    #[must_use]
    pub const fn options(&self) -> &ConnectorOptions {
        &self.options
    }

    /// Subscribe to lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent> {
        self.emitter.subscribe()
    }

    /// Whether the chain id is missing from the configured list.
    #[must_use]
    pub fn is_chain_unsupported(&self, chain_id: u64) -> bool {
        !self.chains.contains(chain_id)
    }

    pub(crate) fn emit_connecting(&self) {
        self.emitter
            .emit(ConnectorEvent::Message(ConnectorMessage::Connecting));
    }

    /// Run the connect sequence.
    ///
    /// Any failure is reported as [`ConnectorError::UserRejected`]; the
    /// cause is only logged.
    pub async fn connect(&self, chain_id: Option<u64>) -> Result<ConnectResult> {
        self.try_connect(chain_id).await.map_err(|error| {
            debug!(%error, "connect failed");
            ConnectorError::user_rejected()
        })
    }

    async fn try_connect(&self, chain_id: Option<u64>) -> Result<ConnectResult> {
        if self.emit_connecting {
            self.emit_connecting();
        }

        let provider = self.provider(chain_id).await?;
        self.subscribe_provider(&provider).await;

        // Fails without an authenticated session.
        let account = self.account().await?;

        let mut id = self.chain_id()?;
        match chain_id {
            Some(target) if target != id => {
                id = self.switch_chain(target).await?.id;
            }
            _ => {}
        }
        let chain = ChainStatus {
            id,
            unsupported: self.is_chain_unsupported(id),
        };

        info!(account = %account, chain_id = id, unsupported = chain.unsupported, "connected");
        Ok(ConnectResult {
            account,
            chain,
            provider,
        })
    }

    /// The checksummed address of the authenticated account.
    pub async fn account(&self) -> Result<String> {
        let signer = self.signer().await?;
        let address = signer.address().await?;
        Ok(address.to_checksum(None))
    }

    /// The cached provider wrapper, built on first use.
    ///
    /// The first call also builds the SDK for `chain_id` (if not built yet)
    /// and binds the wrapper to `chain_id`, or to [`chain_id`](Self::chain_id)
    /// when none is given.
    pub async fn provider(&self, chain_id: Option<u64>) -> Result<Arc<Web3Provider>> {
        self.provider
            .get_or_try_init(|| async {
                let sdk = self.sdk(chain_id).await?;
                let network = match chain_id {
                    Some(id) => id,
                    None => self.chain_id()?,
                };
                debug!(chain_id = network, "creating provider wrapper");
                Ok::<_, ConnectorError>(Arc::new(Web3Provider::new(sdk.rpc_provider(), network)))
            })
            .await
            .map(Arc::clone)
    }

    /// A signer bound to the cached provider.
    pub async fn signer(&self) -> Result<JsonRpcSigner> {
        Ok(self.provider(None).await?.signer())
    }

    /// Whether an account can be fetched. Never fails.
    pub async fn is_authorized(&self) -> bool {
        match self.account().await {
            Ok(_) => true,
            Err(error) => {
                debug!(%error, "not authorized");
                false
            }
        }
    }

    /// The current chain id.
    ///
    /// Resolution order: the provider's network, the configured `chain_id`
    /// option, the first configured chain.
    pub fn chain_id(&self) -> Result<u64> {
        if let Some(provider) = self.provider.get() {
            return Ok(provider.network_chain_id());
        }
        self.options
            .chain_id
            .or_else(|| self.chains.iter().next().map(|chain| chain.id))
            .ok_or_else(|| ConnectorError::missing_network("Missing network in provider"))
    }

    /// Ask the wallet to switch to `chain_id`, adding the chain if the
    /// wallet does not know it.
    pub async fn switch_chain(&self, chain_id: u64) -> Result<Chain> {
        let provider = self.provider(None).await?;
        let hex_id = hex_value(chain_id);

        let switched = provider
            .send("wallet_switchEthereumChain", json!([{ "chainId": hex_id }]))
            .await;

        let error = match switched {
            Ok(_) => {
                let chain = self.chains.get(chain_id)?.clone();
                provider.set_network_chain_id(chain_id);
                info!(chain_id, "switched chain");
                return Ok(chain);
            }
            Err(error) => error,
        };

        let chain = self.chains.get(chain_id)?.clone();

        if error.is_unrecognized_chain() {
            debug!(chain_id, "chain unknown to wallet, requesting add");
            provider
                .send("wallet_addEthereumChain", json!([chain.add_chain_params()]))
                .await
                .map_err(|add_error| {
                    debug!(error = %add_error, chain_id, "wallet refused to add chain");
                    ConnectorError::AddChain
                })?;
            provider.set_network_chain_id(chain_id);
            info!(chain_id, "added and switched chain");
            return Ok(chain);
        }

        Err(ConnectorError::SwitchChain(error))
    }

    /// Remove the provider listeners registered by `connect`.
    ///
    /// A no-op when nothing is registered.
    pub async fn disconnect(&self) {
        let Some(subscriptions) = self.subscriptions.lock().await.take() else {
            return;
        };
        for (kind, id) in subscriptions.ids {
            subscriptions.provider.remove_listener(kind, id);
        }
        info!("provider listeners released");
    }

    /// The cached SDK instance, built on first use.
    ///
    /// Chain for construction: `chain_id`, else the configured `chain_id`
    /// option, else the first configured chain.
    pub async fn sdk(&self, chain_id: Option<u64>) -> Result<SharedWalletSdk> {
        self.sdk
            .get_or_try_init(|| async {
                let chain = match chain_id.or(self.options.chain_id) {
                    Some(id) => self.chains.get(id)?,
                    None => self.chains.first(),
                };
                let config = SdkConfig {
                    api_key: self.options.api_key.clone(),
                    network: NetworkConfig {
                        rpc_url: chain.rpc_urls.sdk_url().to_string(),
                        chain_id: chain.id,
                    },
                    extensions: vec![self.extension],
                    options: self.options.additional_options.clone().unwrap_or_default(),
                };
                info!(
                    chain_id = chain.id,
                    extension = self.extension.name(),
                    "initializing wallet SDK",
                );
                self.factory.create(config)
            })
            .await
            .map(Arc::clone)
    }

    async fn subscribe_provider(&self, provider: &Arc<Web3Provider>) {
        let mut subscriptions = self.subscriptions.lock().await;
        if subscriptions.is_some() {
            return;
        }

        let handler = Arc::new(ProviderEventHandler {
            emitter: self.emitter.clone(),
            chains: Arc::clone(&self.chains),
            provider: Arc::downgrade(provider),
        });
        let listener: EventListener = Arc::new(move |event: &ProviderEvent| handler.handle(event));

        let ids: Vec<_> = ProviderEventKind::ALL
            .into_iter()
            .filter_map(|kind| {
                provider
                    .on(kind, Arc::clone(&listener))
                    .map(|id| (kind, id))
            })
            .collect();

        if ids.is_empty() {
            debug!("provider does not support event subscription");
            return;
        }
        debug!(count = ids.len(), "provider listeners registered");
        *subscriptions = Some(Subscriptions {
            provider: Arc::clone(provider),
            ids,
        });
    }
}

/// Translates provider events into connector events.
struct ProviderEventHandler {
    emitter: EventEmitter,
    chains: Arc<ChainList>,
    provider: Weak<Web3Provider>,
}

impl ProviderEventHandler {
    fn handle(&self, event: &ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.on_accounts_changed(accounts),
            ProviderEvent::ChainChanged(chain_id) => self.on_chain_changed(chain_id),
            ProviderEvent::Disconnect(_) => self.emitter.emit(ConnectorEvent::Disconnect),
        }
    }

    fn on_accounts_changed(&self, accounts: &[String]) {
        let Some(first) = accounts.first() else {
            self.emitter.emit(ConnectorEvent::Disconnect);
            return;
        };
        match checksum_address(first) {
            Ok(account) => self.emitter.emit(ConnectorEvent::account_changed(account)),
            Err(error) => warn!(%error, "ignoring accountsChanged event"),
        }
    }

    fn on_chain_changed(&self, chain_id: &Value) {
        let id = match normalize_chain_id(chain_id) {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "ignoring chainChanged event");
                return;
            }
        };
        if let Some(provider) = self.provider.upgrade() {
            provider.set_network_chain_id(id);
        }
        self.emitter.emit(ConnectorEvent::chain_changed(ChainStatus {
            id,
            unsupported: !self.chains.contains(id),
        }));
    }
}
