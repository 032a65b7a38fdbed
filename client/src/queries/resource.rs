//! Dispatch over resource kinds

use futures::future::join_all;
use openapi_client::models::{
    ActionResponse, Application, Database, Project, ResourceType, Server, Service, Team,
};

use crate::cache::key::QueryKey;
use crate::errors::CoolifyError;
use crate::http::applications::StartOptions;
use crate::queries::{keys, Queries};

/// Any manageable resource
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Application(Application),
    Database(Database),
    Service(Service),
    Project(Project),
    Server(Server),
    Team(Team),
}

impl Resource {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Resource::Application(_) => ResourceType::Application,
            Resource::Database(_) => ResourceType::Database,
            Resource::Service(_) => ResourceType::Service,
            Resource::Project(_) => ResourceType::Project,
            Resource::Server(_) => ResourceType::Server,
            Resource::Team(_) => ResourceType::Team,
        }
    }

    /// The uuid, or the decimal id for teams
    pub fn id(&self) -> String {
        match self {
            Resource::Application(r) => r.uuid.clone(),
            Resource::Database(r) => r.uuid.clone(),
            Resource::Service(r) => r.uuid.clone(),
            Resource::Project(r) => r.uuid.clone(),
            Resource::Server(r) => r.uuid.clone(),
            Resource::Team(r) => r.id.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Resource::Application(r) => &r.name,
            Resource::Database(r) => &r.name,
            Resource::Service(r) => &r.name,
            Resource::Project(r) => &r.name,
            Resource::Server(r) => &r.name,
            Resource::Team(r) => &r.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Resource::Application(r) => r.description.as_deref(),
            Resource::Database(r) => r.description.as_deref(),
            Resource::Service(r) => r.description.as_deref(),
            Resource::Project(r) => r.description.as_deref(),
            Resource::Server(r) => r.description.as_deref(),
            Resource::Team(r) => r.description.as_deref(),
        }
    }

    /// Runtime status, for the kinds that report one
    pub fn status(&self) -> Option<&str> {
        match self {
            Resource::Application(r) => r.status.as_deref(),
            Resource::Database(r) => r.status.as_deref(),
            Resource::Service(r) => r.status.as_deref(),
            Resource::Project(_) | Resource::Server(_) | Resource::Team(_) => None,
        }
    }
}

fn parse_team_id(id: &str) -> Result<u64, CoolifyError> {
    id.parse()
        .map_err(|_| CoolifyError::Validation(format!("Invalid team id: {}", id)))
}

fn entity_key(id: &str, resource_type: ResourceType) -> Result<QueryKey, CoolifyError> {
    Ok(match resource_type {
        ResourceType::Application => keys::application(id),
        ResourceType::Database => keys::database(id),
        ResourceType::Service => keys::service(id),
        ResourceType::Project => keys::project(id),
        ResourceType::Server => keys::server(id),
        ResourceType::Team => keys::team(parse_team_id(id)?),
    })
}

fn not_runnable(resource_type: ResourceType, action: &str) -> CoolifyError {
    CoolifyError::UnsupportedOperation(format!("{} {}", action, resource_type))
}

impl Queries {
    /// Fetch one resource of any kind; `id` is the team id for teams
    pub async fn resource(&self, id: &str, resource_type: ResourceType) -> Result<Resource, CoolifyError> {
        Ok(match resource_type {
            ResourceType::Application => Resource::Application(self.application(id).await?),
            ResourceType::Database => Resource::Database(self.database(id).await?),
            ResourceType::Service => Resource::Service(self.service(id).await?),
            ResourceType::Project => Resource::Project(self.project(id).await?),
            ResourceType::Server => Resource::Server(self.server(id).await?),
            ResourceType::Team => Resource::Team(self.team(parse_team_id(id)?).await?),
        })
    }

    /// Same as [`Queries::resource`], skipping any cached value
    pub async fn refetch_resource(
        &self,
        id: &str,
        resource_type: ResourceType,
    ) -> Result<Resource, CoolifyError> {
        self.cache.invalidate(&entity_key(id, resource_type)?);
        self.resource(id, resource_type).await
    }

    /// Fetch several resources of mixed kinds concurrently
    ///
    /// Results come back in the order of `targets`; one failure does not
    /// fail the others.
    pub async fn resources_by_id(
        &self,
        targets: &[(ResourceType, String)],
    ) -> Vec<Result<Resource, CoolifyError>> {
        join_all(
            targets
                .iter()
                .map(|(resource_type, id)| self.resource(id, *resource_type)),
        )
        .await
    }

    pub async fn resources(&self, resource_type: ResourceType) -> Result<Vec<Resource>, CoolifyError> {
        Ok(match resource_type {
            ResourceType::Application => self
                .applications()
                .await?
                .into_iter()
                .map(Resource::Application)
                .collect(),
            ResourceType::Database => self
                .databases()
                .await?
                .into_iter()
                .map(Resource::Database)
                .collect(),
            ResourceType::Service => self
                .services()
                .await?
                .into_iter()
                .map(Resource::Service)
                .collect(),
            ResourceType::Project => self
                .projects()
                .await?
                .into_iter()
                .map(Resource::Project)
                .collect(),
            ResourceType::Server => self
                .servers()
                .await?
                .into_iter()
                .map(Resource::Server)
                .collect(),
            ResourceType::Team => self.teams().await?.into_iter().map(Resource::Team).collect(),
        })
    }

    pub async fn start_resource(
        &self,
        id: &str,
        resource_type: ResourceType,
    ) -> Result<ActionResponse, CoolifyError> {
        match resource_type {
            ResourceType::Application => self.start_application(id, StartOptions::default()).await,
            ResourceType::Database => self.start_database(id).await,
            ResourceType::Service => self.start_service(id).await,
            ResourceType::Project | ResourceType::Server | ResourceType::Team => {
                Err(not_runnable(resource_type, "start"))
            }
        }
    }

    pub async fn stop_resource(
        &self,
        id: &str,
        resource_type: ResourceType,
    ) -> Result<ActionResponse, CoolifyError> {
        match resource_type {
            ResourceType::Application => self.stop_application(id).await,
            ResourceType::Database => self.stop_database(id).await,
            ResourceType::Service => self.stop_service(id).await,
            ResourceType::Project | ResourceType::Server | ResourceType::Team => {
                Err(not_runnable(resource_type, "stop"))
            }
        }
    }

    pub async fn restart_resource(
        &self,
        id: &str,
        resource_type: ResourceType,
    ) -> Result<ActionResponse, CoolifyError> {
        match resource_type {
            ResourceType::Application => self.restart_application(id).await,
            ResourceType::Database => self.restart_database(id).await,
            ResourceType::Service => self.restart_service(id).await,
            ResourceType::Project | ResourceType::Server | ResourceType::Team => {
                Err(not_runnable(resource_type, "restart"))
            }
        }
    }
}
