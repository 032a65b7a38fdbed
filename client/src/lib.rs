//! coolkit
//!
//! Client core for managing a self-hosted Coolify instance: a typed API
//! client, a shared query cache with optimistic updates, favorites and the
//! setup/session state.

pub mod app;
pub mod cache;
pub mod cli;
pub mod errors;
pub mod favorites;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod queries;
pub mod session;
pub mod storage;
pub mod utils;
pub mod workers;
