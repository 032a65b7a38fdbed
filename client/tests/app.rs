//! Application wiring over a temporary storage layout

mod support;

use coolkit::app::options::AppOptions;
use coolkit::app::state::AppState;
use coolkit::favorites::FavoriteResource;
use coolkit::filesys::dir::Dir;
use coolkit::session::{OnboardingStep, StartupStatus};
use coolkit::storage::layout::StorageLayout;
use coolkit::storage::settings::Settings;
use openapi_client::models::ResourceType;
use serde_json::json;
use support::{FakeCoolify, VALID_TOKEN};
use tokio_test::assert_ok;

async fn init(dir: &Dir) -> AppState {
    let options = AppOptions::from_settings(StorageLayout::new(dir.path()), &Settings::default());
    AppState::init(options).await.unwrap()
}

#[tokio::test]
async fn test_fresh_layout_starts_unconfigured() {
    let dir = Dir::create_temp_dir("coolkit-app").await.unwrap();
    let state = init(&dir).await;

    assert_eq!(state.session.startup_check().await, StartupStatus::NotConfigured);
    assert_eq!(
        state.session.onboarding_step(&[]).await,
        OnboardingStep::ConfigureServer
    );
    assert!(state.favorites.favorites().is_empty());
    assert!(dir.subdir("secure").exists().await);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let meta = std::fs::metadata(dir.subdir("secure").path()).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o700);
    }

    dir.delete().await.unwrap();
}

#[tokio::test]
async fn test_setup_and_favorites_persist_across_restarts() {
    let fake = FakeCoolify::start().await;
    *fake.state.teams.lock().unwrap() = vec![json!({"id": 0, "name": "Root Team"})];
    let dir = Dir::create_temp_dir("coolkit-app").await.unwrap();

    {
        let state = init(&dir).await;
        assert_ok!(state.session.set_server_address(&fake.address).await);
        assert_ok!(state.session.set_api_token(VALID_TOKEN).await);
        assert_ok!(state.session.acknowledge_permissions().await);

        // the client picks up the new credentials without a reload
        let teams = assert_ok!(state.queries.teams().await);
        assert_eq!(
            state.session.onboarding_step(&teams).await,
            OnboardingStep::SelectTeam
        );
        assert_ok!(state.session.select_team("0").await);
        assert_eq!(state.session.onboarding_step(&teams).await, OnboardingStep::Ready);
        assert_ok!(state.session.set_setup_complete(true).await);

        assert_ok!(
            state
                .favorites
                .toggle_favorite(FavoriteResource::new("a1", ResourceType::Application))
                .await
        );
    }

    let state = init(&dir).await;
    assert_eq!(state.session.startup_check().await, StartupStatus::Ready);
    assert!(state
        .favorites
        .is_favorite(&FavoriteResource::new("a1", ResourceType::Application)));

    dir.delete().await.unwrap();
}
