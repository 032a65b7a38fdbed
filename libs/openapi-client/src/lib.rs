//! Coolify REST API models
//!
//! Serde types for the entities and request/response bodies exposed by the
//! Coolify `/api/v1` surface.

pub mod models;
