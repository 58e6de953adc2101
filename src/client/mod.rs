//! Client transport subsystem.
//!
//! # Data Flow
//! ```text
//! call(service, method, input)
//!     → codec (encode in the client's Format)
//!     → POST <base_url><prefix><service>/<method>
//!     → 200: codec (decode, camelCase-normalized for JSON) → output
//!     → other: parse {code, msg} envelope → ClientError::Twirp
//! ```
//!
//! # Design Decisions
//! - Network failures are reported as-is, no body parsing is attempted
//! - No retries or pooling policy at this layer; reqwest's defaults apply

pub mod error;
pub mod transport;

pub use error::ClientError;
pub use transport::Client;
