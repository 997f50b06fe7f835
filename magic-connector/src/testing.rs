//! Scripted provider and SDK doubles for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::chain::Chain;
use crate::config::ConnectorOptions;
use crate::connector::{Connector, ConnectorBuilder};
use crate::error::{ConnectorError, Result, RpcError};
use crate::provider::{
    EventListener, ListenerId, ProviderEvent, ProviderEventKind, RpcProvider, SharedRpcProvider,
};
use crate::sdk::{
    MagicLinkRequest, RedirectLoginRequest, SdkConfig, SdkFactory, SharedWalletSdk, WalletSdk,
};

/// Lowercase form of the EIP-55 reference address.
pub const TEST_ACCOUNT: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
/// Checksummed form of [`TEST_ACCOUNT`].
pub const TEST_ACCOUNT_CHECKSUM: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

#[derive(Default)]
struct ProviderState {
    responses: HashMap<String, std::result::Result<Value, RpcError>>,
    requests: Vec<(String, Value)>,
    listeners: Vec<(ProviderEventKind, ListenerId, EventListener)>,
}

/// Provider that records requests and answers from a per-method script.
///
/// Unscripted methods answer `null`, except `eth_accounts` which answers `[]`.
pub struct MockProvider {
    state: Mutex<ProviderState>,
    next_listener: AtomicU64,
    events: bool,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ProviderState::default()),
            next_listener: AtomicU64::new(1),
            events: true,
        })
    }

    pub fn without_events() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(ProviderState::default()),
            next_listener: AtomicU64::new(1),
            events: false,
        })
    }

    pub fn with_accounts(self: Arc<Self>, accounts: &[&str]) -> Arc<Self> {
        self.set_accounts(accounts);
        self
    }

    pub fn respond(self: Arc<Self>, method: &str, value: Value) -> Arc<Self> {
        self.script(method, Ok(value));
        self
    }

    pub fn fail(self: Arc<Self>, method: &str, error: RpcError) -> Arc<Self> {
        self.script(method, Err(error));
        self
    }

    pub fn script(&self, method: &str, response: std::result::Result<Value, RpcError>) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(method.to_string(), response);
    }

    pub fn set_accounts(&self, accounts: &[&str]) {
        self.script("eth_accounts", Ok(json!(accounts)));
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn calls(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }

    pub fn last_params(&self, method: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
    }

    pub fn listener_count(&self, kind: ProviderEventKind) -> usize {
        self.state
            .lock()
            .unwrap()
            .listeners
            .iter()
            .filter(|(k, _, _)| *k == kind)
            .count()
    }

    /// Deliver an event to every listener registered for its kind.
    pub fn emit(&self, event: &ProviderEvent) {
        let listeners: Vec<EventListener> = self
            .state
            .lock()
            .unwrap()
            .listeners
            .iter()
            .filter(|(kind, _, _)| *kind == event.kind())
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

#[async_trait]
impl RpcProvider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> std::result::Result<Value, RpcError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push((method.to_string(), params));
        match state.responses.get(method) {
            Some(response) => response.clone(),
            None if method == "eth_accounts" => Ok(json!([])),
            None => Ok(Value::Null),
        }
    }

    fn on(&self, event: ProviderEventKind, listener: EventListener) -> Option<ListenerId> {
        if !self.events {
            return None;
        }
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.state
            .lock()
            .unwrap()
            .listeners
            .push((event, id, listener));
        Some(id)
    }

    fn remove_listener(&self, event: ProviderEventKind, id: ListenerId) {
        self.state
            .lock()
            .unwrap()
            .listeners
            .retain(|(kind, lid, _)| !(*kind == event && *lid == id));
    }
}

/// Calls recorded by [`MockSdk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    IsLoggedIn,
    Logout,
    EndSession,
    LoginWithRedirect(RedirectLoginRequest),
    LoginWithMagicLink(MagicLinkRequest),
}

/// SDK double sharing one [`MockProvider`].
///
/// A successful login exposes [`TEST_ACCOUNT`]; logout clears it.
pub struct MockSdk {
    provider: Arc<MockProvider>,
    logged_in: AtomicBool,
    reject_logins: bool,
    fail_session_check: bool,
    calls: Mutex<Vec<SdkCall>>,
}

impl MockSdk {
    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SdkCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn complete_login(&self) -> Result<()> {
        if self.reject_logins {
            return Err(ConnectorError::sdk("user canceled login"));
        }
        self.logged_in.store(true, Ordering::SeqCst);
        self.provider.set_accounts(&[TEST_ACCOUNT]);
        Ok(())
    }
}

#[async_trait]
impl WalletSdk for MockSdk {
    fn rpc_provider(&self) -> SharedRpcProvider {
        Arc::clone(&self.provider) as SharedRpcProvider
    }

    async fn is_logged_in(&self) -> Result<bool> {
        self.record(SdkCall::IsLoggedIn);
        if self.fail_session_check {
            return Err(ConnectorError::sdk("session check failed"));
        }
        Ok(self.logged_in.load(Ordering::SeqCst))
    }

    async fn logout(&self) -> Result<bool> {
        self.record(SdkCall::Logout);
        self.logged_in.store(false, Ordering::SeqCst);
        self.provider.set_accounts(&[]);
        Ok(true)
    }

    async fn end_session(&self) -> Result<()> {
        self.record(SdkCall::EndSession);
        self.provider.set_accounts(&[]);
        Ok(())
    }

    async fn login_with_redirect(&self, request: RedirectLoginRequest) -> Result<()> {
        self.record(SdkCall::LoginWithRedirect(request));
        self.complete_login()
    }

    async fn login_with_magic_link(&self, request: MagicLinkRequest) -> Result<Option<String>> {
        self.record(SdkCall::LoginWithMagicLink(request));
        self.complete_login().map(|()| Some("did-token".to_string()))
    }
}

/// Factory recording every SDK construction.
pub struct MockSdkFactory {
    provider: Arc<MockProvider>,
    logged_in: bool,
    reject_logins: bool,
    fail_session_check: bool,
    created: Mutex<Vec<SdkConfig>>,
    last: Mutex<Option<Arc<MockSdk>>>,
}

impl MockSdkFactory {
    pub fn new(provider: Arc<MockProvider>) -> Self {
        Self {
            provider,
            logged_in: false,
            reject_logins: false,
            fail_session_check: false,
            created: Mutex::new(Vec::new()),
            last: Mutex::new(None),
        }
    }

    /// Start with an authenticated session exposing [`TEST_ACCOUNT`].
    pub fn logged_in(mut self) -> Self {
        self.logged_in = true;
        self.provider.set_accounts(&[TEST_ACCOUNT]);
        self
    }

    pub const fn rejecting_logins(mut self) -> Self {
        self.reject_logins = true;
        self
    }

    pub const fn failing_session_check(mut self) -> Self {
        self.fail_session_check = true;
        self
    }

    pub fn created(&self) -> Vec<SdkConfig> {
        self.created.lock().unwrap().clone()
    }

    pub fn sdk(&self) -> Arc<MockSdk> {
        self.last.lock().unwrap().clone().unwrap()
    }
}

impl SdkFactory for MockSdkFactory {
    fn create(&self, config: SdkConfig) -> Result<SharedWalletSdk> {
        self.created.lock().unwrap().push(config);
        let sdk = Arc::new(MockSdk {
            provider: Arc::clone(&self.provider),
            logged_in: AtomicBool::new(self.logged_in),
            reject_logins: self.reject_logins,
            fail_session_check: self.fail_session_check,
            calls: Mutex::new(Vec::new()),
        });
        *self.last.lock().unwrap() = Some(Arc::clone(&sdk));
        Ok(sdk)
    }
}

/// Builder preloaded with a mock factory, the given chains and options.
pub fn builder(
    factory: &Arc<MockSdkFactory>,
    chains: Vec<Chain>,
    options: ConnectorOptions,
) -> ConnectorBuilder {
    Connector::builder()
        .chains(chains)
        .options(options)
        .shared_sdk_factory(Arc::clone(factory) as crate::sdk::SharedSdkFactory)
}
