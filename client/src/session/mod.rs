//! Setup and session state

pub mod address;
pub mod credentials;

use std::sync::Arc;

use openapi_client::models::Team;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::cache::QueryCache;
use crate::errors::CoolifyError;
use crate::http::client::HttpClient;
use crate::storage::keys;
use crate::storage::store::{get_json, set_json, KeyValueStore};

pub use address::{normalize_address, validate_address};
pub use credentials::SessionState;

use credentials::Snapshot;

/// Stored in place of a team id when none has been chosen
pub const NO_TEAM_SELECTED: &str = "NO_TEAM_SELECTED";

const UNAUTHENTICATED: &str = "Unauthenticated.";
const INVALID_TOKEN: &str = "Invalid token.";
const API_DISABLED: &str = "API is disabled.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamSelection {
    NotSelected,
    Team(String),
}

impl TeamSelection {
    fn from_stored(raw: Option<String>) -> Self {
        match raw {
            Some(id) if id != NO_TEAM_SELECTED && !id.is_empty() => TeamSelection::Team(id),
            _ => TeamSelection::NotSelected,
        }
    }
}

/// Result of the launch-time check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStatus {
    NotConfigured,
    Unreachable,
    Ready,
}

/// Next screen of the first-run flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    ConfigureServer,
    ConfigureToken,
    AcknowledgePermissions,
    SelectTeam,
    /// The token sees no team at all
    NoTeams,
    Ready,
}

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    secure: Arc<dyn KeyValueStore>,
    state: Arc<SessionState>,
    http: Arc<HttpClient>,
    cache: Arc<QueryCache>,
}

impl Session {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        secure: Arc<dyn KeyValueStore>,
        state: Arc<SessionState>,
        http: Arc<HttpClient>,
        cache: Arc<QueryCache>,
    ) -> Self {
        Self {
            store,
            secure,
            state,
            http,
            cache,
        }
    }

    /// Populate the in-memory mirror from storage
    pub async fn load(&self) -> Result<(), CoolifyError> {
        let snapshot = Snapshot {
            server_address: self.store.get_item(keys::SERVER_ADDRESS).await?,
            api_token: self
                .secure
                .get_item(keys::API_TOKEN)
                .await?
                .map(SecretString::from),
            setup_complete: get_json(self.store.as_ref(), keys::SETUP_COMPLETE)
                .await?
                .unwrap_or(false),
            selected_team: self.store.get_item(keys::SELECTED_TEAM).await?,
            permissions_acknowledged: get_json(self.store.as_ref(), keys::PERMISSIONS_ACKNOWLEDGED)
                .await?
                .unwrap_or(false),
        };
        self.state.replace(snapshot).await;
        Ok(())
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub async fn server_address(&self) -> Option<String> {
        self.state.snapshot().await.server_address
    }

    pub async fn has_api_token(&self) -> bool {
        self.state.snapshot().await.api_token.is_some()
    }

    /// Validate, normalize, probe and persist a server address
    ///
    /// Nothing is stored unless the instance answers its health check.
    /// Switching to a different instance drops every cached query.
    pub async fn set_server_address(&self, address: &str) -> Result<String, CoolifyError> {
        validate_address(address)?;
        let address = normalize_address(address);

        let healthy = match self.http.health(&address).await {
            Ok(body) => address::is_healthy_body(&body),
            Err(e) => {
                warn!("Health check against {} failed: {}", address, e);
                false
            }
        };
        if !healthy {
            return Err(CoolifyError::InvalidServer(address));
        }

        let previous = self.store.get_item(keys::SERVER_ADDRESS).await?;
        if previous.as_deref() != Some(address.as_str()) {
            info!("Server address changed, clearing query cache");
            self.cache.clear();
        }

        self.store.set_item(keys::SERVER_ADDRESS, &address).await?;
        self.state
            .modify(|s| s.server_address = Some(address.clone()))
            .await;
        Ok(address)
    }

    /// Check `token` against the configured instance and store it on success
    pub async fn set_api_token(&self, token: &str) -> Result<(), CoolifyError> {
        let address = self
            .server_address()
            .await
            .ok_or_else(|| CoolifyError::Configuration("Server address not found".to_string()))?;
        let token = SecretString::from(token.trim().to_string());

        let validation = self.http.validate_token(&address, &token).await?;
        if !validation.success {
            let message = validation.message.unwrap_or_default();
            return Err(match message.as_str() {
                UNAUTHENTICATED | INVALID_TOKEN => CoolifyError::InvalidToken,
                API_DISABLED => CoolifyError::ApiDisabled,
                _ => CoolifyError::Api(message),
            });
        }

        self.secure
            .set_item(keys::API_TOKEN, token.expose_secret())
            .await?;
        self.state.modify(|s| s.api_token = Some(token)).await;
        if let Some(version) = validation.version {
            info!("Token accepted by Coolify {}", version);
        }
        Ok(())
    }

    pub async fn is_setup_complete(&self) -> bool {
        self.state.snapshot().await.setup_complete
    }

    pub async fn set_setup_complete(&self, complete: bool) -> Result<(), CoolifyError> {
        set_json(self.store.as_ref(), keys::SETUP_COMPLETE, &complete).await?;
        self.state.modify(|s| s.setup_complete = complete).await;
        Ok(())
    }

    /// Forget the instance: credentials, completion flag and cached data
    pub async fn reset_setup(&self) -> Result<(), CoolifyError> {
        self.secure.remove_item(keys::API_TOKEN).await?;
        self.store.remove_item(keys::SERVER_ADDRESS).await?;
        set_json(self.store.as_ref(), keys::SETUP_COMPLETE, &false).await?;

        self.state
            .modify(|s| {
                s.server_address = None;
                s.api_token = None;
                s.setup_complete = false;
            })
            .await;
        self.cache.clear();
        info!("Setup reset");
        Ok(())
    }

    pub async fn selected_team(&self) -> TeamSelection {
        TeamSelection::from_stored(self.state.snapshot().await.selected_team)
    }

    pub async fn select_team(&self, team_id: &str) -> Result<(), CoolifyError> {
        let team_id = team_id.trim();
        if team_id.is_empty() || team_id == NO_TEAM_SELECTED {
            return Err(CoolifyError::Validation(format!("Invalid team id: {:?}", team_id)));
        }
        self.store.set_item(keys::SELECTED_TEAM, team_id).await?;
        self.state
            .modify(|s| s.selected_team = Some(team_id.to_string()))
            .await;
        Ok(())
    }

    pub async fn clear_team_selection(&self) -> Result<(), CoolifyError> {
        self.store
            .set_item(keys::SELECTED_TEAM, NO_TEAM_SELECTED)
            .await?;
        self.state
            .modify(|s| s.selected_team = Some(NO_TEAM_SELECTED.to_string()))
            .await;
        Ok(())
    }

    pub async fn permissions_acknowledged(&self) -> bool {
        self.state.snapshot().await.permissions_acknowledged
    }

    pub async fn acknowledge_permissions(&self) -> Result<(), CoolifyError> {
        set_json(self.store.as_ref(), keys::PERMISSIONS_ACKNOWLEDGED, &true).await?;
        self.state.modify(|s| s.permissions_acknowledged = true).await;
        Ok(())
    }

    /// Decide whether the configured instance can be used right away
    pub async fn startup_check(&self) -> StartupStatus {
        let snapshot = self.state.snapshot().await;
        let address = match (&snapshot.server_address, &snapshot.api_token) {
            (Some(address), Some(_)) if snapshot.setup_complete => address.clone(),
            _ => return StartupStatus::NotConfigured,
        };

        match self.http.health(&address).await {
            Ok(body) if address::is_healthy_body(&body) => StartupStatus::Ready,
            Ok(body) => {
                warn!("Unexpected health response from {}: {}", address, body.trim());
                StartupStatus::Unreachable
            }
            Err(e) => {
                warn!("Server unreachable at {}: {}", address, e);
                StartupStatus::Unreachable
            }
        }
    }

    /// Route the first-run flow given the teams visible to the token
    pub async fn onboarding_step(&self, teams: &[Team]) -> OnboardingStep {
        let snapshot = self.state.snapshot().await;
        onboarding_step(&snapshot, teams)
    }
}

fn onboarding_step(snapshot: &Snapshot, teams: &[Team]) -> OnboardingStep {
    if snapshot.server_address.is_none() {
        return OnboardingStep::ConfigureServer;
    }
    if snapshot.api_token.is_none() {
        return OnboardingStep::ConfigureToken;
    }
    if !snapshot.permissions_acknowledged {
        return OnboardingStep::AcknowledgePermissions;
    }
    if teams.is_empty() {
        return OnboardingStep::NoTeams;
    }
    match TeamSelection::from_stored(snapshot.selected_team.clone()) {
        TeamSelection::Team(id) if teams.iter().any(|t| t.id.to_string() == id) => {
            OnboardingStep::Ready
        }
        _ => OnboardingStep::SelectTeam,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: u64) -> Team {
        serde_json::from_value(serde_json::json!({"id": id, "name": format!("team-{id}")})).unwrap()
    }

    fn configured() -> Snapshot {
        Snapshot {
            server_address: Some("https://coolify.example.com".to_string()),
            api_token: Some(SecretString::from("1|abc")),
            setup_complete: false,
            selected_team: None,
            permissions_acknowledged: true,
        }
    }

    #[test]
    fn test_onboarding_order() {
        let teams = vec![team(0)];
        assert_eq!(
            onboarding_step(&Snapshot::default(), &teams),
            OnboardingStep::ConfigureServer
        );

        let mut snapshot = configured();
        snapshot.api_token = None;
        assert_eq!(onboarding_step(&snapshot, &teams), OnboardingStep::ConfigureToken);

        let mut snapshot = configured();
        snapshot.permissions_acknowledged = false;
        assert_eq!(
            onboarding_step(&snapshot, &teams),
            OnboardingStep::AcknowledgePermissions
        );
    }

    #[test]
    fn test_onboarding_team_selection() {
        let mut snapshot = configured();
        assert_eq!(onboarding_step(&snapshot, &[]), OnboardingStep::NoTeams);
        assert_eq!(onboarding_step(&snapshot, &[team(0)]), OnboardingStep::SelectTeam);

        snapshot.selected_team = Some(NO_TEAM_SELECTED.to_string());
        assert_eq!(onboarding_step(&snapshot, &[team(0)]), OnboardingStep::SelectTeam);

        snapshot.selected_team = Some("7".to_string());
        assert_eq!(onboarding_step(&snapshot, &[team(0)]), OnboardingStep::SelectTeam);
        assert_eq!(
            onboarding_step(&snapshot, &[team(0), team(7)]),
            OnboardingStep::Ready
        );
    }

    #[test]
    fn test_team_selection_sentinel() {
        assert_eq!(TeamSelection::from_stored(None), TeamSelection::NotSelected);
        assert_eq!(
            TeamSelection::from_stored(Some(NO_TEAM_SELECTED.to_string())),
            TeamSelection::NotSelected
        );
        assert_eq!(
            TeamSelection::from_stored(Some("3".to_string())),
            TeamSelection::Team("3".to_string())
        );
    }
}
