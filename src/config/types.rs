// Deserialized configuration sections
// `statics` describes the mount table, the rest tunes the server around it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whole configuration, one field per top-level section
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub statics: StaticsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive for the tracing subscriber (e.g. `info`, `pathmount=debug`)
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Connection handling limits
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed for a request head to arrive, 0 disables it
    pub read_timeout: u64,
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Mount table configuration
///
/// Maps are keyed by mount URL. `BTreeMap` keeps bulk registration
/// deterministic, which matters for equal-length prefixes.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StaticsConfig {
    /// Prefer `<file>.gz` siblings when present
    #[serde(default)]
    pub gzip: bool,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// url -> file path
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    /// url -> directory path
    #[serde(default)]
    pub directories: BTreeMap<String, String>,
    /// url -> registered function name
    #[serde(default)]
    pub mountpoints: BTreeMap<String, String>,
    /// urls forwarded unchanged to the next pipeline stage
    #[serde(default)]
    pub applications: Vec<String>,
    /// url -> registered websocket callback name
    #[serde(default)]
    pub websockets: BTreeMap<String, String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_chunk_size() -> usize {
    crate::http::body::DEFAULT_CHUNK_SIZE
}

impl Default for StaticsConfig {
    fn default() -> Self {
        Self {
            gzip: false,
            chunk_size: default_chunk_size(),
            files: BTreeMap::new(),
            directories: BTreeMap::new(),
            mountpoints: BTreeMap::new(),
            applications: Vec::new(),
            websockets: BTreeMap::new(),
        }
    }
}
