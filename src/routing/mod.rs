//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Service definition (descriptors + handlers)
//!     → descriptor.rs (route key "<prefix><service>/<method>")
//!     → handler.rs (typed handler wrapped as RawHandler)
//!     → table.rs (RouteTable, published through SharedRoutes)
//!
//! Incoming request path
//!     → SharedRoutes::load() (current table snapshot)
//!     → RouteTable::resolve() (exact match)
//!     → Return: handler or bad_route
//! ```
//!
//! # Design Decisions
//! - O(1) exact lookup, case-sensitive, no prefix scanning
//! - Bindings replaceable at runtime without restarting the listener

pub mod descriptor;
pub mod handler;
pub mod table;

pub use descriptor::{normalize_prefix, route_key, CallDescriptor, ServiceDescriptor, DEFAULT_PREFIX};
pub use handler::{Handler, RawHandler, TypedHandler};
pub use table::{RouteError, RouteTable, SharedRoutes};
