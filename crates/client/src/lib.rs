//! Client for the Spark standalone master REST submission API.
//!
//! [`SubmissionClient`] submits drivers, polls their status, and asks the
//! master to kill them. Each call is one HTTP round trip; the decoded
//! record is returned alongside the raw response in an [`ApiResponse`].
//! A synchronous wrapper lives in [`blocking`].

pub mod api;
pub mod blocking;
pub mod error;
pub mod response;

pub use api::SubmissionClient;
pub use error::ClientError;
pub use response::ApiResponse;

pub use sparkrest_core::driver::{normalize_driver_id, DriverState};
pub use sparkrest_core::submission::{
    ErrorResponse, KillResult, StatusResult, SubmissionResult, SubmitOptions,
};
pub use sparkrest_core::ClientConfig;
