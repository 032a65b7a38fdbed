//! Query keys per entity

use crate::cache::key::QueryKey;

pub const APPLICATIONS: &str = "applications";
pub const DATABASES: &str = "databases";
pub const SERVICES: &str = "services";
pub const PROJECTS: &str = "projects";
pub const SERVERS: &str = "servers";
pub const PRIVATE_KEYS: &str = "private-keys";
pub const TEAMS: &str = "teams";
pub const DEPLOYMENTS: &str = "deployments";

pub fn applications() -> QueryKey {
    QueryKey::new([APPLICATIONS])
}

pub fn application(uuid: &str) -> QueryKey {
    applications().child(uuid)
}

pub fn application_logs(uuid: &str, lines: u32) -> QueryKey {
    application(uuid).child("logs").child(lines.to_string())
}

pub fn application_envs(uuid: &str) -> QueryKey {
    application(uuid).child("envs")
}

pub fn databases() -> QueryKey {
    QueryKey::new([DATABASES])
}

pub fn database(uuid: &str) -> QueryKey {
    databases().child(uuid)
}

pub fn services() -> QueryKey {
    QueryKey::new([SERVICES])
}

pub fn service(uuid: &str) -> QueryKey {
    services().child(uuid)
}

pub fn projects() -> QueryKey {
    QueryKey::new([PROJECTS])
}

pub fn project(uuid: &str) -> QueryKey {
    projects().child(uuid)
}

pub fn servers() -> QueryKey {
    QueryKey::new([SERVERS])
}

pub fn server(uuid: &str) -> QueryKey {
    servers().child(uuid)
}

pub fn server_resources(uuid: &str) -> QueryKey {
    server(uuid).child("resources")
}

pub fn private_keys() -> QueryKey {
    QueryKey::new([PRIVATE_KEYS])
}

pub fn private_key(uuid: &str) -> QueryKey {
    private_keys().child(uuid)
}

pub fn teams() -> QueryKey {
    QueryKey::new([TEAMS])
}

pub fn team(id: u64) -> QueryKey {
    teams().child(id.to_string())
}

pub fn current_team() -> QueryKey {
    teams().child("current")
}

/// In-progress deployments across the instance
pub fn deployments() -> QueryKey {
    QueryKey::new([DEPLOYMENTS])
}

pub fn deployment(uuid: &str) -> QueryKey {
    deployments().child(uuid)
}

pub fn application_deployments(application_uuid: &str, skip: u32, take: u32) -> QueryKey {
    QueryKey::new([DEPLOYMENTS, "applications", application_uuid])
        .child(skip.to_string())
        .child(take.to_string())
}
