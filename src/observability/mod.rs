//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and client produce:
//!     → tracing events (request ID, route, code)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
