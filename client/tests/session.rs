//! Setup flow against a fake instance

mod support;

use std::sync::Arc;

use coolkit::cache::{QueryCache, QueryKey};
use coolkit::errors::CoolifyError;
use coolkit::filesys::dir::Dir;
use coolkit::http::client::HttpClient;
use coolkit::session::{OnboardingStep, Session, SessionState, StartupStatus, TeamSelection};
use coolkit::storage::keys;
use coolkit::storage::store::{FileStore, KeyValueStore};
use openapi_client::models::Team;
use serde_json::json;
use support::{FakeCoolify, VALID_TOKEN};
use tokio_test::{assert_err, assert_ok};

struct Harness {
    dir: Dir,
    store: Arc<FileStore>,
    secure: Arc<FileStore>,
    cache: Arc<QueryCache>,
    session: Session,
}

impl Harness {
    async fn new() -> Self {
        let dir = Dir::create_temp_dir("coolkit-session").await.unwrap();
        let store = Arc::new(FileStore::new(dir.subdir("preferences")));
        let secure = Arc::new(FileStore::secure(dir.subdir("secure")));
        let cache = Arc::new(QueryCache::new());

        let state = Arc::new(SessionState::new());
        let http = Arc::new(HttpClient::new(state.clone()).unwrap());
        let session = Session::new(store.clone(), secure.clone(), state, http, cache.clone());
        session.load().await.unwrap();

        Self {
            dir,
            store,
            secure,
            cache,
            session,
        }
    }

    async fn cleanup(self) {
        self.dir.delete().await.unwrap();
    }
}

#[tokio::test]
async fn test_invalid_url_is_rejected_without_network() {
    let fake = FakeCoolify::start().await;
    let h = Harness::new().await;

    let err = assert_err!(h.session.set_server_address("coolify.example.com").await);
    assert!(matches!(err, CoolifyError::Validation(_)));
    assert!(fake.state.requests().is_empty());
    assert_eq!(h.store.get_item(keys::SERVER_ADDRESS).await.unwrap(), None);

    h.cleanup().await;
}

#[tokio::test]
async fn test_failed_health_check_is_not_persisted() {
    let fake = FakeCoolify::start().await;
    *fake.state.health_body.lock().unwrap() = "<html>Welcome</html>".to_string();
    let h = Harness::new().await;

    let err = assert_err!(h.session.set_server_address(&fake.address).await);
    assert!(matches!(err, CoolifyError::InvalidServer(_)));
    assert_eq!(h.store.get_item(keys::SERVER_ADDRESS).await.unwrap(), None);
    assert!(h.session.server_address().await.is_none());

    h.cleanup().await;
}

#[tokio::test]
async fn test_unreachable_server_is_invalid() {
    let h = Harness::new().await;

    // nothing listens on port 9 locally
    let err = assert_err!(h.session.set_server_address("http://127.0.0.1:9").await);
    assert!(matches!(err, CoolifyError::InvalidServer(_)));

    h.cleanup().await;
}

#[tokio::test]
async fn test_address_is_normalized_and_persisted() {
    let fake = FakeCoolify::start().await;
    let h = Harness::new().await;

    let address = assert_ok!(h.session.set_server_address(&format!("{}/api/", fake.address)).await);
    assert_eq!(address, fake.address);
    assert_eq!(
        h.store.get_item(keys::SERVER_ADDRESS).await.unwrap().as_deref(),
        Some(fake.address.as_str())
    );
    assert!(fake.state.requests().contains(&"GET /health".to_string()));

    h.cleanup().await;
}

#[tokio::test]
async fn test_changing_address_clears_cache() {
    let first = FakeCoolify::start().await;
    let second = FakeCoolify::start().await;
    let h = Harness::new().await;
    let key = QueryKey::new(["applications"]);

    assert_ok!(h.session.set_server_address(&first.address).await);
    h.cache.set(key.clone(), json!([{"uuid": "a1"}]));

    // same address keeps cached data
    assert_ok!(h.session.set_server_address(&first.address).await);
    assert!(h.cache.get(&key).is_some());

    assert_ok!(h.session.set_server_address(&second.address).await);
    assert!(h.cache.is_empty());

    h.cleanup().await;
}

#[tokio::test]
async fn test_token_requires_address() {
    let h = Harness::new().await;
    let err = assert_err!(h.session.set_api_token(VALID_TOKEN).await);
    assert!(matches!(err, CoolifyError::Configuration(_)));
    h.cleanup().await;
}

#[tokio::test]
async fn test_bad_token_is_not_persisted() {
    let fake = FakeCoolify::start().await;
    let h = Harness::new().await;
    assert_ok!(h.session.set_server_address(&fake.address).await);

    let err = assert_err!(h.session.set_api_token("1|wrong").await);
    assert!(matches!(err, CoolifyError::InvalidToken));
    assert_eq!(h.secure.get_item(keys::API_TOKEN).await.unwrap(), None);
    assert!(!h.session.has_api_token().await);

    assert_ok!(h.session.set_api_token(VALID_TOKEN).await);
    assert_eq!(
        h.secure.get_item(keys::API_TOKEN).await.unwrap().as_deref(),
        Some(VALID_TOKEN)
    );

    h.cleanup().await;
}

#[tokio::test]
async fn test_api_disabled() {
    let fake = FakeCoolify::start().await;
    *fake.state.api_disabled.lock().unwrap() = true;
    let h = Harness::new().await;
    assert_ok!(h.session.set_server_address(&fake.address).await);

    let err = assert_err!(h.session.set_api_token(VALID_TOKEN).await);
    assert!(matches!(err, CoolifyError::ApiDisabled));

    h.cleanup().await;
}

#[tokio::test]
async fn test_other_token_rejections_keep_the_server_message() {
    let fake = FakeCoolify::start().await;
    *fake.state.version_rejection.lock().unwrap() =
        Some("This token has no read permission.".to_string());
    let h = Harness::new().await;
    assert_ok!(h.session.set_server_address(&fake.address).await);

    let err = assert_err!(h.session.set_api_token(VALID_TOKEN).await);
    match &err {
        CoolifyError::Api(message) => {
            assert_eq!(message, "This token has no read permission.")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.secure.get_item(keys::API_TOKEN).await.unwrap(), None);

    h.cleanup().await;
}

#[tokio::test]
async fn test_reset_setup_forgets_everything() {
    let fake = FakeCoolify::start().await;
    let h = Harness::new().await;
    assert_ok!(h.session.set_server_address(&fake.address).await);
    assert_ok!(h.session.set_api_token(VALID_TOKEN).await);
    assert_ok!(h.session.set_setup_complete(true).await);
    h.cache.set(QueryKey::new(["teams"]), json!([]));

    assert_eq!(h.session.startup_check().await, StartupStatus::Ready);

    assert_ok!(h.session.reset_setup().await);
    assert!(!h.session.is_setup_complete().await);
    assert!(h.session.server_address().await.is_none());
    assert_eq!(h.secure.get_item(keys::API_TOKEN).await.unwrap(), None);
    assert!(h.cache.is_empty());
    assert_eq!(h.session.startup_check().await, StartupStatus::NotConfigured);

    h.cleanup().await;
}

#[tokio::test]
async fn test_startup_check_reports_unreachable() {
    let fake = FakeCoolify::start().await;
    let h = Harness::new().await;
    assert_ok!(h.session.set_server_address(&fake.address).await);
    assert_ok!(h.session.set_api_token(VALID_TOKEN).await);
    assert_ok!(h.session.set_setup_complete(true).await);

    *fake.state.health_body.lock().unwrap() = "maintenance".to_string();
    assert_eq!(h.session.startup_check().await, StartupStatus::Unreachable);

    h.cleanup().await;
}

#[tokio::test]
async fn test_session_survives_reload() {
    let fake = FakeCoolify::start().await;
    let h = Harness::new().await;
    assert_ok!(h.session.set_server_address(&fake.address).await);
    assert_ok!(h.session.set_api_token(VALID_TOKEN).await);
    assert_ok!(h.session.acknowledge_permissions().await);
    assert_ok!(h.session.select_team("0").await);

    let state = Arc::new(SessionState::new());
    let http = Arc::new(HttpClient::new(state.clone()).unwrap());
    let reloaded = Session::new(h.store.clone(), h.secure.clone(), state, http, h.cache.clone());
    assert_ok!(reloaded.load().await);

    assert_eq!(reloaded.server_address().await.as_deref(), Some(fake.address.as_str()));
    assert!(reloaded.has_api_token().await);
    assert!(reloaded.permissions_acknowledged().await);
    assert_eq!(reloaded.selected_team().await, TeamSelection::Team("0".to_string()));

    let teams: Vec<Team> = vec![serde_json::from_value(json!({"id": 0, "name": "Root Team"})).unwrap()];
    assert_eq!(reloaded.onboarding_step(&teams).await, OnboardingStep::Ready);

    assert_ok!(reloaded.clear_team_selection().await);
    assert_eq!(reloaded.selected_team().await, TeamSelection::NotSelected);
    assert_eq!(reloaded.onboarding_step(&teams).await, OnboardingStep::SelectTeam);

    h.cleanup().await;
}
