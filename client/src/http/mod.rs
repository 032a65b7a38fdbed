//! Coolify REST endpoints

pub mod applications;
pub mod client;
pub mod databases;
pub mod deployments;
pub mod projects;
pub mod servers;
pub mod services;
pub mod teams;

pub use client::{Credentials, CredentialsProvider, HttpClient, RequestOptions, TokenValidation};
