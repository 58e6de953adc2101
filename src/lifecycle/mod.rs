//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGINT → wait_for_signal() resolves
//!     → broadcast::Sender::send(())
//!     → TwirpServer::run stops accepting → in-flight requests drain → exit
//! ```

pub mod signals;
