//! Project queries

use openapi_client::models::{CreateProject, CreatedResource, Project};

use crate::cache::sync::UUID_FIELD;
use crate::errors::CoolifyError;
use crate::queries::keys;
use crate::queries::mutation::MutationKey;
use crate::queries::Queries;

impl Queries {
    pub async fn projects(&self) -> Result<Vec<Project>, CoolifyError> {
        self.fetch_list(keys::projects(), UUID_FIELD, || self.http.list_projects())
            .await
    }

    pub async fn project(&self, uuid: &str) -> Result<Project, CoolifyError> {
        self.fetch_single(keys::project(uuid), || self.http.get_project(uuid))
            .await
    }

    pub async fn create_project(
        &self,
        request: &CreateProject,
    ) -> Result<CreatedResource, CoolifyError> {
        if request.name.trim().is_empty() {
            return Err(CoolifyError::Validation("Name is required".to_string()));
        }
        let _pending = self.mutations.begin(MutationKey::create(keys::PROJECTS));
        let created = self.http.create_project(request).await?;
        self.seed_created(&keys::projects(), &created.uuid, request, &created)?;
        Ok(created)
    }
}
