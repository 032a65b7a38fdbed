//! A fake Coolify instance for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use coolkit::cache::{QueryCache, QueryKey};
use coolkit::http::client::{CredentialsProvider, HttpClient};
use coolkit::queries::Queries;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{json, Value};

pub const VALID_TOKEN: &str = "1|valid-token";

#[derive(Default)]
pub struct FakeState {
    pub health_body: Mutex<String>,
    pub api_disabled: Mutex<bool>,
    /// Message `/version` rejects every token with, when set
    pub version_rejection: Mutex<Option<String>>,
    pub applications: Mutex<Vec<Value>>,
    pub databases: Mutex<Vec<Value>>,
    pub services: Mutex<Vec<Value>>,
    pub projects: Mutex<Vec<Value>>,
    pub servers: Mutex<Vec<Value>>,
    pub private_keys: Mutex<Vec<Value>>,
    pub teams: Mutex<Vec<Value>>,
    /// Statuses served for successive polls of a deployment; the last one sticks
    pub deployment_statuses: Mutex<HashMap<String, VecDeque<&'static str>>>,
    /// History served by `/deployments/applications/{uuid}`
    pub application_deployments: Mutex<Vec<Value>>,
    /// Method and path of every request received
    pub requests: Mutex<Vec<String>>,
    /// Cache the client under test writes to, inspected mid-request
    pub observed_cache: Mutex<Option<Arc<QueryCache>>>,
    /// Cache value seen while a PATCH was being handled
    pub seen_during_patch: Mutex<Option<Value>>,
}

impl FakeState {
    fn record(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub struct FakeCoolify {
    pub address: String,
    pub state: Arc<FakeState>,
}

impl FakeCoolify {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        *state.health_body.lock().unwrap() = "OK".to_string();

        let app = Router::new()
            .route("/api/v1/health", get(health))
            .route("/api/v1/version", get(version))
            .route("/api/v1/teams", get(teams))
            .route("/api/v1/applications", get(list_applications))
            .route("/api/v1/applications/public", post(create_public_application))
            .route(
                "/api/v1/applications/{uuid}",
                get(get_application)
                    .patch(update_application)
                    .delete(delete_application),
            )
            .route("/api/v1/applications/{uuid}/envs", post(create_env))
            .route("/api/v1/applications/{uuid}/restart", post(restart_application))
            .route("/api/v1/databases", get(list_databases))
            .route("/api/v1/services", get(list_services))
            .route("/api/v1/services/{uuid}", axum::routing::delete(delete_service))
            .route("/api/v1/projects", get(list_projects).post(create_project))
            .route("/api/v1/servers", get(list_servers))
            .route("/api/v1/security/keys", get(list_private_keys))
            .route("/api/v1/deployments/{uuid}", get(get_deployment))
            .route(
                "/api/v1/deployments/applications/{uuid}",
                get(list_application_deployments),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address, state }
    }

    /// Queries against this instance with the valid token
    pub fn queries(&self) -> Queries {
        let credentials = Arc::new(StaticCredentials::new(&self.address, VALID_TOKEN));
        let http = Arc::new(HttpClient::new(credentials).unwrap());
        let cache = Arc::new(QueryCache::new());
        *self.state.observed_cache.lock().unwrap() = Some(cache.clone());
        Queries::new(http, cache)
    }
}

/// Fixed credentials
pub struct StaticCredentials {
    address: String,
    token: String,
}

impl StaticCredentials {
    pub fn new(address: &str, token: &str) -> Self {
        Self {
            address: address.to_string(),
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentials {
    async fn server_address(&self) -> Option<String> {
        Some(self.address.clone())
    }

    async fn api_token(&self) -> Option<SecretString> {
        Some(SecretString::from(self.token.clone()))
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", VALID_TOKEN).as_str())
}

fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Unauthenticated."})),
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"message": "Not found."}))).into_response()
}

async fn health(State(state): State<Arc<FakeState>>) -> String {
    state.record("GET /health".to_string());
    state.health_body.lock().unwrap().clone()
}

async fn version(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.record("GET /version".to_string());
    if *state.api_disabled.lock().unwrap() {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"message": "API is disabled."})),
        )
            .into_response();
    }
    if let Some(message) = state.version_rejection.lock().unwrap().clone() {
        return (StatusCode::FORBIDDEN, Json(json!({"message": message}))).into_response();
    }
    if !authorized(&headers) {
        return unauthenticated();
    }
    "4.0.0-beta.400".into_response()
}

async fn teams(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthenticated();
    }
    Json(Value::Array(state.teams.lock().unwrap().clone())).into_response()
}

async fn list_applications(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.record("GET /applications".to_string());
    if !authorized(&headers) {
        return unauthenticated();
    }
    Json(Value::Array(state.applications.lock().unwrap().clone())).into_response()
}

fn find(list: &[Value], uuid: &str) -> Option<Value> {
    list.iter().find(|v| v["uuid"] == uuid).cloned()
}

async fn get_application(
    State(state): State<Arc<FakeState>>,
    Path(uuid): Path<String>,
) -> Response {
    state.record(format!("GET /applications/{}", uuid));
    match find(&state.applications.lock().unwrap(), &uuid) {
        Some(app) => Json(app).into_response(),
        None => not_found(),
    }
}

async fn update_application(
    State(state): State<Arc<FakeState>>,
    Path(uuid): Path<String>,
    Json(patch): Json<Value>,
) -> Response {
    state.record(format!("PATCH /applications/{}", uuid));

    let cache = state.observed_cache.lock().unwrap().clone();
    if let Some(cache) = cache {
        *state.seen_during_patch.lock().unwrap() =
            cache.get(&QueryKey::new(["applications", uuid.as_str()]));
    }

    if let Some(name) = patch.get("name").and_then(Value::as_str) {
        if name.is_empty() {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": "Validation failed.",
                    "errors": {"name": ["The name field is required."]}
                })),
            )
                .into_response();
        }
    }

    let mut apps = state.applications.lock().unwrap();
    let Some(app) = apps.iter_mut().find(|v| v["uuid"] == uuid) else {
        return not_found();
    };
    if let (Value::Object(target), Value::Object(fields)) = (app, &patch) {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
    Json(json!({"uuid": uuid})).into_response()
}

async fn delete_application(
    State(state): State<Arc<FakeState>>,
    Path(uuid): Path<String>,
) -> Response {
    state.record(format!("DELETE /applications/{}", uuid));
    state
        .applications
        .lock()
        .unwrap()
        .retain(|v| v["uuid"] != uuid);
    Json(json!({"message": "Application deletion request queued."})).into_response()
}

async fn create_env(State(state): State<Arc<FakeState>>, Path(uuid): Path<String>) -> Response {
    state.record(format!("POST /applications/{}/envs", uuid));
    Json(json!({"message": "Environment variable already exists. Use PATCH request to update it."}))
        .into_response()
}

async fn restart_application(
    State(state): State<Arc<FakeState>>,
    Path(uuid): Path<String>,
) -> Response {
    state.record(format!("POST /applications/{}/restart", uuid));
    Json(json!({
        "message": "Restart request queued.",
        "deployment_uuid": format!("dep-{}", uuid),
    }))
    .into_response()
}

async fn list_services(State(state): State<Arc<FakeState>>) -> Response {
    state.record("GET /services".to_string());
    Json(Value::Array(state.services.lock().unwrap().clone())).into_response()
}

async fn delete_service(
    State(state): State<Arc<FakeState>>,
    Path(uuid): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    state.record(format!("DELETE /services/{}?{}", uuid, query.unwrap_or_default()));
    state.services.lock().unwrap().retain(|v| v["uuid"] != uuid);
    Json(json!({"message": "Service deletion request queued."})).into_response()
}

async fn list_databases(State(state): State<Arc<FakeState>>) -> Response {
    state.record("GET /databases".to_string());
    Json(Value::Array(state.databases.lock().unwrap().clone())).into_response()
}

async fn list_projects(State(state): State<Arc<FakeState>>) -> Response {
    state.record("GET /projects".to_string());
    Json(Value::Array(state.projects.lock().unwrap().clone())).into_response()
}

async fn create_project(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    state.record("POST /projects".to_string());
    let uuid = format!("p-{}", state.projects.lock().unwrap().len() + 1);
    let mut project = body;
    project["uuid"] = json!(uuid);
    state.projects.lock().unwrap().push(project);
    (StatusCode::CREATED, Json(json!({"uuid": uuid}))).into_response()
}

async fn create_public_application(
    State(state): State<Arc<FakeState>>,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST /applications/public".to_string());
    let uuid = format!("a-{}", state.applications.lock().unwrap().len() + 1);
    let domain = format!("https://{}.example.com", uuid);
    let mut app = body;
    app["uuid"] = json!(uuid);
    state.applications.lock().unwrap().push(app);
    (StatusCode::CREATED, Json(json!({"uuid": uuid, "domains": [domain]}))).into_response()
}

async fn list_servers(State(state): State<Arc<FakeState>>) -> Response {
    state.record("GET /servers".to_string());
    Json(Value::Array(state.servers.lock().unwrap().clone())).into_response()
}

async fn list_private_keys(State(state): State<Arc<FakeState>>) -> Response {
    state.record("GET /security/keys".to_string());
    Json(Value::Array(state.private_keys.lock().unwrap().clone())).into_response()
}

async fn get_deployment(State(state): State<Arc<FakeState>>, Path(uuid): Path<String>) -> Response {
    state.record(format!("GET /deployments/{}", uuid));
    let mut statuses = state.deployment_statuses.lock().unwrap();
    let Some(queue) = statuses.get_mut(&uuid) else {
        return not_found();
    };
    let status = if queue.len() > 1 {
        queue.pop_front().unwrap_or("queued")
    } else {
        queue.front().copied().unwrap_or("queued")
    };
    let logs = json!([
        {"output": "Starting deployment", "type": "stdout", "timestamp": "2026-10-01T10:00:00.000000Z", "hidden": false, "batch": 1, "order": 1},
        {"output": "docker build", "type": "stdout", "timestamp": "2026-10-01T10:00:01.000000Z", "hidden": true, "batch": 1, "order": 2},
        {"output": "Done", "type": "stdout", "timestamp": "2026-10-01T10:00:02.000000Z", "hidden": false, "batch": 2, "order": 1}
    ]);
    Json(json!({
        "id": 1,
        "deployment_uuid": uuid,
        "application_id": "3",
        "status": status,
        "logs": logs.to_string(),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct Page {
    skip: usize,
    take: usize,
}

async fn list_application_deployments(
    State(state): State<Arc<FakeState>>,
    Path(uuid): Path<String>,
    Query(page): Query<Page>,
) -> Response {
    state.record(format!(
        "GET /deployments/applications/{}?skip={}&take={}",
        uuid, page.skip, page.take
    ));
    let all = state.application_deployments.lock().unwrap().clone();
    let items: Vec<Value> = all.iter().skip(page.skip).take(page.take).cloned().collect();
    Json(json!({"count": all.len(), "deployments": items})).into_response()
}

pub fn application(uuid: &str, name: &str) -> Value {
    json!({
        "uuid": uuid,
        "name": name,
        "status": "running:healthy",
        "fqdn": format!("https://{}.example.com", name),
        "build_pack": "nixpacks",
    })
}

pub fn deployment(uuid: &str, status: &str) -> Value {
    json!({"deployment_uuid": uuid, "status": status, "application_id": 3})
}
