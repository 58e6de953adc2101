//! Haberdasher example service.
//!
//! Hand-written in the shape schema tooling would emit for:
//!
//! ```text
//! package twitch.twirp.example;
//!
//! service Haberdasher {
//!   rpc MakeHat(Size) returns (Hat);
//! }
//! message Size { int32 inches = 1; }
//! message Hat  { int32 size = 1; string color = 2; string name = 3; }
//! ```

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::client::{Client, ClientError};
use crate::error::TwirpError;
use crate::routing::{CallDescriptor, RouteError, RouteTable, ServiceDescriptor, SharedRoutes};

/// Size of a hat, in inches.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Size {
    #[prost(int32, tag = "1")]
    pub inches: i32,
}

/// A hat, made to order.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hat {
    #[prost(int32, tag = "1")]
    pub size: i32,
    #[prost(string, tag = "2")]
    pub color: String,
    #[prost(string, tag = "3")]
    pub name: String,
}

pub const SERVICE_NAME: &str = "twitch.twirp.example.Haberdasher";

pub const MAKE_HAT: CallDescriptor = CallDescriptor::new(
    SERVICE_NAME,
    "MakeHat",
    "twitch.twirp.example.Size",
    "twitch.twirp.example.Hat",
);

pub const HABERDASHER: ServiceDescriptor = ServiceDescriptor {
    full_name: SERVICE_NAME,
    methods: &[MAKE_HAT],
};

/// Server-side contract.
pub trait Haberdasher: Send + Sync + 'static {
    fn make_hat(&self, size: Size) -> BoxFuture<'static, Result<Hat, TwirpError>>;
}

/// Register every Haberdasher method on `table`.
pub fn register<S: Haberdasher>(table: &mut RouteTable, service: Arc<S>) -> Result<(), RouteError> {
    table.route::<Size, Hat, _>(&MAKE_HAT, move |size: Size| service.make_hat(size))
}

/// Rebind every Haberdasher method to a new implementation.
pub fn rebind<S: Haberdasher>(routes: &SharedRoutes, service: Arc<S>) -> Result<(), RouteError> {
    routes.rebind::<Size, Hat, _>(&MAKE_HAT, move |size: Size| service.make_hat(size))
}

/// Typed client for the Haberdasher service.
#[derive(Debug, Clone)]
pub struct HaberdasherClient {
    client: Client,
}

impl HaberdasherClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn make_hat(&self, size: &Size) -> Result<Hat, ClientError> {
        self.client.invoke(&MAKE_HAT, size).await
    }
}

/// Reference implementation used by the server binary.
#[derive(Debug, Default)]
pub struct FancyHats;

const COLORS: [&str; 5] = ["white", "black", "brown", "red", "blue"];
const NAMES: [&str; 4] = ["bowler", "baseball cap", "top hat", "derby"];

impl Haberdasher for FancyHats {
    fn make_hat(&self, size: Size) -> BoxFuture<'static, Result<Hat, TwirpError>> {
        Box::pin(async move {
            if size.inches <= 0 {
                return Err(TwirpError::invalid_argument("I can't make a hat that small!"));
            }
            let pick = size.inches as usize;
            Ok(Hat {
                size: size.inches,
                color: COLORS[pick % COLORS.len()].to_string(),
                name: NAMES[pick % NAMES.len()].to_string(),
            })
        })
    }
}
