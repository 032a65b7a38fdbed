//! API models

mod application;
mod database;
mod deployment;
mod environment;
mod misc;
mod project;
mod resource;
mod server;
mod service;
mod status;
mod team;

pub mod de;

pub use application::*;
pub use database::*;
pub use deployment::*;
pub use environment::*;
pub use misc::*;
pub use project::*;
pub use resource::*;
pub use server::*;
pub use service::*;
pub use status::*;
pub use team::*;

/// Unknown wire fields kept alongside the typed ones.
pub type Extra = serde_json::Map<String, serde_json::Value>;
