//! Route table and the swappable cell that holds it.
//!
//! # Responsibilities
//! - Map route keys to handlers (exact, case-sensitive match)
//! - Reject duplicate registrations
//! - Allow bindings to be replaced while requests are in flight
//!
//! # Design Decisions
//! - `RouteTable` is an immutable value once published
//! - `SharedRoutes` swaps whole tables atomically (`ArcSwap`), so readers never lock
//! - A request keeps the handler it resolved even if a swap lands mid-dispatch

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;

use crate::codec::Message;
use crate::error::TwirpError;
use crate::routing::descriptor::{normalize_prefix, CallDescriptor};
use crate::routing::handler::{Handler, RawHandler, TypedHandler};

/// Errors raised while building or rebinding routes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route already registered: {0}")]
    Duplicate(String),

    #[error("no route registered for {0}")]
    Unknown(String),

    #[error("route table is mounted at {table:?} but the server is configured for {configured:?}")]
    PrefixMismatch { configured: String, table: String },
}

/// Maps route keys to handlers.
#[derive(Clone)]
pub struct RouteTable {
    prefix: String,
    routes: HashMap<String, Arc<dyn RawHandler>>,
}

impl RouteTable {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
            routes: HashMap::new(),
        }
    }

    /// Normalized prefix routes are mounted under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register a raw handler under a fully qualified route key.
    pub fn register(
        &mut self,
        route_key: impl Into<String>,
        handler: Arc<dyn RawHandler>,
    ) -> Result<(), RouteError> {
        let route_key = route_key.into();
        if self.routes.contains_key(&route_key) {
            return Err(RouteError::Duplicate(route_key));
        }
        self.routes.insert(route_key, handler);
        Ok(())
    }

    /// Register a typed handler for a method.
    pub fn route<I, O, H>(&mut self, call: &CallDescriptor, handler: H) -> Result<(), RouteError>
    where
        I: Message,
        O: Message,
        H: Handler<I, O>,
    {
        let key = call.route_key(&self.prefix);
        self.register(key, Arc::new(TypedHandler::new(handler)))
    }

    /// Find the handler bound to `path`.
    pub fn resolve(&self, path: &str) -> Result<Arc<dyn RawHandler>, TwirpError> {
        self.routes
            .get(path)
            .cloned()
            .ok_or_else(|| TwirpError::bad_route(format!("no handler for path {}", path)))
    }

    pub fn contains(&self, route_key: &str) -> bool {
        self.routes.contains_key(route_key)
    }

    /// Registered keys in sorted order.
    pub fn route_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("prefix", &self.prefix)
            .field("routes", &self.route_keys())
            .finish()
    }
}

/// Shared, atomically replaceable route table.
#[derive(Clone)]
pub struct SharedRoutes {
    inner: Arc<ArcSwap<RouteTable>>,
}

impl SharedRoutes {
    pub fn new(table: RouteTable) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    /// Snapshot of the current table.
    pub fn load(&self) -> Arc<RouteTable> {
        self.inner.load_full()
    }

    /// Replace every binding at once.
    pub fn store(&self, table: RouteTable) {
        tracing::info!(routes = table.len(), "Route table replaced");
        self.inner.store(Arc::new(table));
    }

    /// Replace the handler of an already registered method.
    pub fn rebind<I, O, H>(&self, call: &CallDescriptor, handler: H) -> Result<(), RouteError>
    where
        I: Message,
        O: Message,
        H: Handler<I, O>,
    {
        let handler: Arc<dyn RawHandler> = Arc::new(TypedHandler::new(handler));
        let mut key = String::new();
        let mut bound = false;

        // existence is checked against the table actually being replaced
        self.inner.rcu(|table| {
            key = call.route_key(table.prefix());
            bound = table.contains(&key);
            if !bound {
                return Arc::clone(table);
            }
            let mut next = RouteTable::clone(table);
            next.routes.insert(key.clone(), Arc::clone(&handler));
            Arc::new(next)
        });

        if !bound {
            return Err(RouteError::Unknown(key));
        }

        tracing::info!(route = %key, "Handler rebound");
        Ok(())
    }
}

impl fmt::Debug for SharedRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedRoutes").field(&*self.inner.load()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{self, Format};
    use crate::error::ErrorKind;
    use crate::haberdasher::{Hat, Size, MAKE_HAT};
    use bytes::Bytes;

    fn hat_named(name: &'static str) -> impl Handler<Size, Hat> {
        move |size: Size| async move {
            Ok::<_, TwirpError>(Hat {
                size: size.inches,
                color: "red".into(),
                name: name.into(),
            })
        }
    }

    async fn call_make_hat(table: &RouteTable, path: &str) -> Hat {
        let handler = table.resolve(path).unwrap();
        let body = handler
            .call(Format::Json, Bytes::from_static(br#"{"inches":3}"#))
            .await
            .unwrap();
        codec::decode(&body, Format::Json).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_exact_match() {
        let mut table = RouteTable::new("/twirp/");
        table.route(&MAKE_HAT, hat_named("fancy hat")).unwrap();

        let hat = call_make_hat(&table, "/twirp/twitch.twirp.example.Haberdasher/MakeHat").await;
        assert_eq!(hat.name, "fancy hat");

        for path in [
            "/twirp/twitch.twirp.example.Haberdasher/makeHat",
            "/twirp/twitch.twirp.example.Haberdasher/MakePants",
            "/twitch.twirp.example.Haberdasher/MakeHat",
            "/twirp/twitch.twirp.example.Haberdasher/MakeHat/",
        ] {
            let err = table.resolve(path).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::BadRoute);
            assert_eq!(err.msg(), format!("no handler for path {}", path));
        }
    }

    #[test]
    fn test_duplicate_registration() {
        let mut table = RouteTable::new("");
        table.route(&MAKE_HAT, hat_named("a")).unwrap();
        let err = table.route(&MAKE_HAT, hat_named("b")).unwrap_err();
        assert_eq!(
            err,
            RouteError::Duplicate("/twitch.twirp.example.Haberdasher/MakeHat".into())
        );
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_rebind_swaps_for_next_resolve() {
        let mut table = RouteTable::new("/twirp");
        table.route(&MAKE_HAT, hat_named("old")).unwrap();
        let shared = SharedRoutes::new(table);
        let path = "/twirp/twitch.twirp.example.Haberdasher/MakeHat";

        let before = shared.load();
        shared.rebind(&MAKE_HAT, hat_named("new")).unwrap();

        assert_eq!(call_make_hat(&before, path).await.name, "old");
        assert_eq!(call_make_hat(&shared.load(), path).await.name, "new");
    }

    #[test]
    fn test_rebind_unknown_route() {
        let shared = SharedRoutes::new(RouteTable::new("/twirp/"));
        let err = shared.rebind(&MAKE_HAT, hat_named("x")).unwrap_err();
        assert!(matches!(err, RouteError::Unknown(_)));
    }

    #[test]
    fn test_rebind_after_store_dropped_route() {
        let mut table = RouteTable::new("/twirp/");
        table.route(&MAKE_HAT, hat_named("old")).unwrap();
        let shared = SharedRoutes::new(table);

        shared.store(RouteTable::new("/twirp/"));
        let err = shared.rebind(&MAKE_HAT, hat_named("new")).unwrap_err();
        assert_eq!(
            err,
            RouteError::Unknown("/twirp/twitch.twirp.example.Haberdasher/MakeHat".into())
        );
        assert!(shared.load().is_empty());
    }

    #[tokio::test]
    async fn test_rebind_uses_prefix_of_current_table() {
        let mut table = RouteTable::new("/twirp/");
        table.route(&MAKE_HAT, hat_named("old")).unwrap();
        let shared = SharedRoutes::new(table);

        let mut moved = RouteTable::new("/rpc/");
        moved.route(&MAKE_HAT, hat_named("moved")).unwrap();
        shared.store(moved);

        shared.rebind(&MAKE_HAT, hat_named("new")).unwrap();
        let current = shared.load();
        assert_eq!(current.route_keys(), vec!["/rpc/twitch.twirp.example.Haberdasher/MakeHat"]);
        let hat = call_make_hat(&current, "/rpc/twitch.twirp.example.Haberdasher/MakeHat").await;
        assert_eq!(hat.name, "new");
    }
}
