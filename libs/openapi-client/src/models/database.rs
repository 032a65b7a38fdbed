//! Database models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Extra, Placement};

/// A standalone database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::de::loose_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Fields accepted by `PATCH /databases/{uuid}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDatabase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits_memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits_cpus: Option<String>,
}

/// Database engines accepted by `POST /databases/{engine}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Postgresql,
    Mysql,
    Mariadb,
    Mongodb,
    Redis,
    Keydb,
    Dragonfly,
    Clickhouse,
}

impl DatabaseEngine {
    pub fn as_path(&self) -> &'static str {
        match self {
            DatabaseEngine::Postgresql => "postgresql",
            DatabaseEngine::Mysql => "mysql",
            DatabaseEngine::Mariadb => "mariadb",
            DatabaseEngine::Mongodb => "mongodb",
            DatabaseEngine::Redis => "redis",
            DatabaseEngine::Keydb => "keydb",
            DatabaseEngine::Dragonfly => "dragonfly",
            DatabaseEngine::Clickhouse => "clickhouse",
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for DatabaseEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DatabaseEngine::Postgresql),
            "mysql" => Ok(DatabaseEngine::Mysql),
            "mariadb" => Ok(DatabaseEngine::Mariadb),
            "mongodb" | "mongo" => Ok(DatabaseEngine::Mongodb),
            "redis" => Ok(DatabaseEngine::Redis),
            "keydb" => Ok(DatabaseEngine::Keydb),
            "dragonfly" => Ok(DatabaseEngine::Dragonfly),
            "clickhouse" => Ok(DatabaseEngine::Clickhouse),
            _ => Err(format!("Invalid database engine: {}", s)),
        }
    }
}

/// `POST /databases/{engine}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDatabase {
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant_deploy: Option<bool>,
}
