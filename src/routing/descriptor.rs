//! Call and service descriptors.
//!
//! Produced by schema tooling (or written by hand) and shared read-only by
//! the server and client.

/// Prefix under which routes are mounted when none is configured.
pub const DEFAULT_PREFIX: &str = "/twirp/";

/// Identity of a single RPC method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallDescriptor {
    /// Fully qualified service name, e.g. `twitch.twirp.example.Haberdasher`.
    pub service: &'static str,
    /// Method name as declared in the schema, e.g. `MakeHat`.
    pub method: &'static str,
    /// Fully qualified input shape name.
    pub input_type: &'static str,
    /// Fully qualified output shape name.
    pub output_type: &'static str,
}

impl CallDescriptor {
    pub const fn new(
        service: &'static str,
        method: &'static str,
        input_type: &'static str,
        output_type: &'static str,
    ) -> Self {
        Self {
            service,
            method,
            input_type,
            output_type,
        }
    }

    /// Dot-separated namespace of the service (empty if none).
    pub fn namespace(&self) -> &'static str {
        self.service.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
    }

    /// Unqualified service name.
    pub fn service_name(&self) -> &'static str {
        self.service
            .rsplit_once('.')
            .map(|(_, name)| name)
            .unwrap_or(self.service)
    }

    /// `<prefix><service>/<method>` with the prefix normalized.
    pub fn route_key(&self, prefix: &str) -> String {
        route_key(prefix, self.service, self.method)
    }
}

/// A service and the methods it exposes.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDescriptor {
    pub full_name: &'static str,
    pub methods: &'static [CallDescriptor],
}

impl ServiceDescriptor {
    pub fn method(&self, name: &str) -> Option<&'static CallDescriptor> {
        self.methods.iter().find(|m| m.method == name)
    }
}

/// Build a route key from raw names.
pub fn route_key(prefix: &str, service: &str, method: &str) -> String {
    format!("{}{}/{}", normalize_prefix(prefix), service, method)
}

/// Force a leading and trailing `/`; an empty prefix becomes `/`.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}
