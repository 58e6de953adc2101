//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use twirp_transport::config::ServerConfig;
use twirp_transport::haberdasher::{self, Hat, Size, MAKE_HAT};
use twirp_transport::{Client, Format, RouteTable, SharedRoutes, TwirpError, TwirpServer};

/// A server running on an ephemeral port; shut down on drop.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub routes: SharedRoutes,
    shutdown: broadcast::Sender<()>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub fn client(&self, format: Format) -> Client {
        Client::new(self.base_url(), format)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
    }
}

/// Start a server for `table` on 127.0.0.1.
pub async fn start_server(table: RouteTable) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let config = ServerConfig {
        bind_address: addr.to_string(),
        prefix: table.prefix().to_string(),
        ..ServerConfig::default()
    };
    let server = TwirpServer::new(config, table).unwrap();
    let routes = server.routes();

    let (shutdown, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        let _ = server.run(listener, shutdown_rx).await;
    });

    TestServer {
        addr,
        routes,
        shutdown,
    }
}

/// The handler from the Haberdasher walkthrough.
#[allow(dead_code)]
pub async fn fancy_hat(size: Size) -> Result<Hat, TwirpError> {
    Ok(Hat {
        color: "red".into(),
        name: "fancy hat".into(),
        size: size.inches,
    })
}

/// A Haberdasher server under `prefix` bound to `fancy_hat`.
#[allow(dead_code)]
pub async fn start_haberdasher(prefix: &str) -> TestServer {
    let mut table = RouteTable::new(prefix);
    table.route(&MAKE_HAT, fancy_hat).unwrap();
    start_server(table).await
}

/// Same, but through the service trait.
#[allow(dead_code)]
pub async fn start_fancy_hats() -> TestServer {
    let mut table = RouteTable::new("/twirp/");
    haberdasher::register(&mut table, Arc::new(haberdasher::FancyHats)).unwrap();
    start_server(table).await
}
