//! Shared types for the Spark master REST submission client.
//!
//! Holds the wire records exchanged with the `/v1/submissions` endpoints,
//! client configuration, and driver-id helpers. Nothing here performs I/O;
//! the HTTP side lives in `sparkrest-client`.

pub mod config;
pub mod driver;
pub mod error;
pub mod submission;

pub use config::ClientConfig;
pub use error::CoreError;
