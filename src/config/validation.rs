//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, prefix shape, and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TwirpConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ClientConfig, ObservabilityConfig, ServerConfig, TwirpConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: prefix must start with '/', got {value:?}")]
    InvalidPrefix { field: &'static str, value: String },

    #[error("server.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("client.base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("client.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

pub fn validate_config(config: &TwirpConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_server(&config.server, &mut errors);
    check_client(&config.client, &mut errors);
    check_observability(&config.observability, &mut errors);
    into_result(errors)
}

/// Validate only the client section, for clients built outside `load_config`.
pub fn validate_client(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_client(config, &mut errors);
    into_result(errors)
}

fn check_server(config: &ServerConfig, errors: &mut Vec<ValidationError>) {
    if config.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.bind_address.clone(),
        });
    }

    check_prefix("server.prefix", &config.prefix, errors);

    if config.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
}

fn check_client(config: &ClientConfig, errors: &mut Vec<ValidationError>) {
    check_prefix("client.prefix", &config.prefix, errors);

    let base_url = &config.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ValidationError::InvalidBaseUrl(base_url.clone()));
    }

    if config.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }
}

fn check_observability(config: &ObservabilityConfig, errors: &mut Vec<ValidationError>) {
    if config.metrics_enabled && config.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.metrics_address.clone(),
        });
    }
}

fn check_prefix(field: &'static str, prefix: &str, errors: &mut Vec<ValidationError>) {
    if !prefix.is_empty() && !prefix.starts_with('/') {
        errors.push(ValidationError::InvalidPrefix {
            field,
            value: prefix.to_string(),
        });
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
