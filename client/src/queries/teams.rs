//! Team queries

use openapi_client::models::Team;

use crate::errors::CoolifyError;
use crate::queries::keys;
use crate::queries::Queries;

impl Queries {
    pub async fn teams(&self) -> Result<Vec<Team>, CoolifyError> {
        self.fetch_list(keys::teams(), "id", || self.http.list_teams())
            .await
    }

    pub async fn team(&self, id: u64) -> Result<Team, CoolifyError> {
        self.fetch_single(keys::team(id), || self.http.get_team(id))
            .await
    }

    pub async fn current_team(&self) -> Result<Team, CoolifyError> {
        self.fetch_single(keys::current_team(), || self.http.get_current_team())
            .await
    }
}
