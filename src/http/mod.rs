//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, dispatcher)
//!     → request.rs (request ID, method check, Content-Type negotiation)
//!     → [routing table resolves the handler]
//!     → [handler decodes, runs, encodes]
//!     → response.rs (buffered success body or JSON error envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::TwirpServer;
