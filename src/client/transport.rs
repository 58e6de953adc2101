//! HTTP client for Twirp services.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;

use crate::client::error::ClientError;
use crate::codec::{self, json, CodecError, Format, Message};
use crate::config::validation::validate_client;
use crate::config::{ClientConfig, ConfigError};
use crate::error::{TwirpError, WireError};
use crate::routing::{route_key, CallDescriptor, DEFAULT_PREFIX};

/// One-shot request/response client bound to a base URL and format.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    prefix: String,
    format: Format,
    timeout: Option<Duration>,
}

impl Client {
    /// Create a client for `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>, format: Format) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            format,
            timeout: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        validate_client(config).map_err(ConfigError::Validation)?;

        let mut client = Self::new(config.base_url.clone(), config.format).with_prefix(&config.prefix);
        if let Some(secs) = config.timeout_secs {
            client = client.with_timeout(Duration::from_secs(secs));
        }
        Ok(client)
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Per-request timeout; unset means wait indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured reqwest client (proxies, pooling, TLS).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Full URL of a method.
    pub fn url_for(&self, service: &str, method: &str) -> String {
        format!("{}{}", self.base_url, route_key(&self.prefix, service, method))
    }

    /// Call `service/method` with a typed input.
    pub async fn call<I, O>(&self, service: &str, method: &str, input: &I) -> Result<O, ClientError>
    where
        I: Message,
        O: Message,
    {
        let body = codec::encode(input, self.format)?;
        let bytes = self.send(service, method, self.format, body).await?;
        Ok(codec::decode(&bytes, self.format)?)
    }

    /// Call the method a descriptor names.
    pub async fn invoke<I, O>(&self, call: &CallDescriptor, input: &I) -> Result<O, ClientError>
    where
        I: Message,
        O: Message,
    {
        self.call(call.service, call.method, input).await
    }

    /// Untyped JSON call; the result has camelCase keys.
    ///
    /// Always sent as JSON regardless of the client's format.
    pub async fn call_json(
        &self,
        service: &str,
        method: &str,
        input: &Value,
    ) -> Result<Value, ClientError> {
        let body = serde_json::to_vec(input).map_err(CodecError::from)?;
        let bytes = self.send(service, method, Format::Json, Bytes::from(body)).await?;
        Ok(json::decode_value(&bytes)?)
    }

    async fn send(
        &self,
        service: &str,
        method: &str,
        format: Format,
        body: Bytes,
    ) -> Result<Bytes, ClientError> {
        let url = self.url_for(service, method);
        tracing::debug!(url = %url, format = %format, bytes = body.len(), "Sending Twirp request");

        let mut request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, format.content_type())
            .header(CONTENT_LENGTH, body.len())
            .body(body);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status != StatusCode::OK {
            let wire: WireError = serde_json::from_slice(&bytes)
                .map_err(|source| ClientError::ErrorBody { status, source })?;
            let err = TwirpError::from_wire(wire);
            tracing::debug!(url = %url, status = %status, code = err.code(), "Twirp call failed");
            return Err(err.into());
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::ValidationError;

    #[test]
    fn test_url_for() {
        let client = Client::new("http://localhost:8080/", Format::Json);
        assert_eq!(
            client.url_for("twitch.twirp.example.Haberdasher", "MakeHat"),
            "http://localhost:8080/twirp/twitch.twirp.example.Haberdasher/MakeHat"
        );

        let client = client.with_prefix("");
        assert_eq!(
            client.url_for("twitch.twirp.example.Haberdasher", "MakeHat"),
            "http://localhost:8080/twitch.twirp.example.Haberdasher/MakeHat"
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = ClientConfig::default();
        config.prefix = "/rpc".into();
        config.format = Format::Json;
        let client = Client::from_config(&config).unwrap();
        assert_eq!(client.format(), Format::Json);
        assert_eq!(
            client.url_for("a.B", "C"),
            format!("{}/rpc/a.B/C", config.base_url)
        );

        config.base_url = "localhost:8080".into();
        match Client::from_config(&config) {
            Err(ClientError::Config(ConfigError::Validation(errors))) => {
                assert_eq!(
                    errors,
                    vec![ValidationError::InvalidBaseUrl("localhost:8080".into())]
                );
            }
            other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // nothing listens on the discard port
        let client = Client::new("http://127.0.0.1:9", Format::Protobuf);
        let err = client
            .call::<crate::haberdasher::Size, crate::haberdasher::Hat>(
                "twitch.twirp.example.Haberdasher",
                "MakeHat",
                &crate::haberdasher::Size { inches: 1 },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
        assert_eq!(err.code(), crate::error::ErrorKind::Unavailable);
    }
}
