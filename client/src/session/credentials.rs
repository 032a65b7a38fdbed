//! In-memory mirror of the persisted session

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use crate::http::client::CredentialsProvider;

#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    pub server_address: Option<String>,
    pub api_token: Option<SecretString>,
    pub setup_complete: bool,
    pub selected_team: Option<String>,
    pub permissions_acknowledged: bool,
}

/// Session values as last read from or written to storage
///
/// The HTTP client resolves credentials through this mirror, so a new
/// address or token is used by the next request without a reload.
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<Snapshot>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.clone()
    }

    pub(crate) async fn replace(&self, snapshot: Snapshot) {
        *self.inner.write().await = snapshot;
    }

    pub(crate) async fn modify<F: FnOnce(&mut Snapshot)>(&self, f: F) {
        let mut guard = self.inner.write().await;
        f(&mut guard);
    }
}

#[async_trait]
impl CredentialsProvider for SessionState {
    async fn server_address(&self) -> Option<String> {
        self.inner.read().await.server_address.clone()
    }

    async fn api_token(&self) -> Option<SecretString> {
        self.inner.read().await.api_token.clone()
    }
}
