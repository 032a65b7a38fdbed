//! Project API client

use openapi_client::models::{CreateProject, CreatedResource, Project};
use serde_json::Value;

use crate::errors::CoolifyError;
use crate::http::client::{decode_outcome, endpoint, HttpClient};

impl HttpClient {
    pub async fn list_projects(&self) -> Result<Vec<Project>, CoolifyError> {
        self.get("/projects").await
    }

    pub async fn get_project(&self, uuid: &str) -> Result<Project, CoolifyError> {
        self.get(&endpoint(&["projects", uuid])?).await
    }

    pub async fn create_project(
        &self,
        request: &CreateProject,
    ) -> Result<CreatedResource, CoolifyError> {
        let body: Value = self.post("/projects", request).await?;
        decode_outcome(body)
    }
}
