//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::cache::QueryCache;
use crate::errors::CoolifyError;
use crate::favorites::FavoritesStore;
use crate::http::client::HttpClient;
use crate::queries::Queries;
use crate::session::{Session, SessionState};
use crate::storage::preferences::Preferences;
use crate::storage::store::{FileStore, KeyValueStore};

/// Main application state
pub struct AppState {
    pub options: AppOptions,

    /// Shared query cache
    pub cache: Arc<QueryCache>,

    /// HTTP client resolving credentials through the session
    pub http_client: Arc<HttpClient>,

    pub session: Arc<Session>,

    pub queries: Arc<Queries>,

    pub favorites: Arc<FavoritesStore>,

    pub preferences: Arc<Preferences>,
}

impl AppState {
    /// Wire the stores, cache, client and session for `options.layout`
    pub async fn init(options: AppOptions) -> Result<Self, CoolifyError> {
        info!("Initializing application state...");
        options.layout.setup().await?;

        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::new(options.layout.preferences_dir()));
        let secure: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::secure(options.layout.secure_dir()));

        let cache = Arc::new(QueryCache::new());
        let session_state = Arc::new(SessionState::new());
        let http_client = Arc::new(HttpClient::new(session_state.clone())?);

        let session = Arc::new(Session::new(
            store.clone(),
            secure,
            session_state,
            http_client.clone(),
            cache.clone(),
        ));
        session.load().await?;

        let favorites = Arc::new(FavoritesStore::new(store.clone()));
        favorites.load().await?;

        let queries = Arc::new(Queries::new(http_client.clone(), cache.clone()));
        let preferences = Arc::new(Preferences::new(store));

        Ok(Self {
            options,
            cache,
            http_client,
            session,
            queries,
            favorites,
            preferences,
        })
    }
}
