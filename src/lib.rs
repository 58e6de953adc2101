//! Twirp-style RPC transport.
//!
//! Exposes service methods over HTTP `POST` with binary protobuf or JSON
//! bodies, routes them by `<prefix><service>/<method>`, and reports every
//! failure as a `{code, msg}` JSON envelope. The client side rebuilds the
//! same typed errors from that envelope.

// Wire format and error model
pub mod codec;
pub mod error;

// Core subsystems
pub mod client;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

// Example service
pub mod haberdasher;

pub use client::{Client, ClientError};
pub use codec::{Format, Message};
pub use config::TwirpConfig;
pub use error::{ErrorKind, TwirpError, WireError};
pub use http::TwirpServer;
pub use routing::{CallDescriptor, Handler, RouteTable, ServiceDescriptor, SharedRoutes};
