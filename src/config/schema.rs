//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! transport. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::codec::Format;
use crate::routing::DEFAULT_PREFIX;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TwirpConfig {
    /// Server dispatcher settings.
    pub server: ServerConfig,

    /// Client transport settings (used by the CLI).
    pub client: ClientConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Server dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path prefix routes are mounted under.
    pub prefix: String,

    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Client transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme, host and port of the server.
    pub base_url: String,

    /// Path prefix; must match the server's.
    pub prefix: String,

    /// Wire format for typed calls.
    pub format: Format,

    /// Per-request timeout. None waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            format: Format::Protobuf,
            timeout_secs: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive; `RUST_LOG` overrides it.
    pub log_filter: String,

    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "twirp_transport=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
