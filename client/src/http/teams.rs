//! Team API client

use openapi_client::models::Team;

use crate::errors::CoolifyError;
use crate::http::client::{endpoint, HttpClient};

impl HttpClient {
    pub async fn list_teams(&self) -> Result<Vec<Team>, CoolifyError> {
        self.get("/teams").await
    }

    pub async fn get_team(&self, id: u64) -> Result<Team, CoolifyError> {
        let id = id.to_string();
        self.get(&endpoint(&["teams", id.as_str()])?).await
    }

    /// The team the token belongs to
    pub async fn get_current_team(&self) -> Result<Team, CoolifyError> {
        self.get("/teams/current").await
    }
}
