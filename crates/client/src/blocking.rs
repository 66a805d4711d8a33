//! Synchronous wrapper around [`crate::SubmissionClient`].
//!
//! Owns a small tokio runtime and blocks the calling thread for the full
//! round trip. Do not create, call, or drop it from inside an async
//! context; use the async client there instead.

use std::collections::BTreeMap;

use sparkrest_core::submission::{KillResult, StatusResult, SubmissionResult, SubmitOptions};
use sparkrest_core::ClientConfig;

use crate::api;
use crate::error::ClientError;
use crate::response::ApiResponse;

/// Blocking client for a single Spark master REST endpoint.
///
/// Safe to share between threads; concurrent calls are bounded by
/// `max_connections` exactly as on the async client.
#[derive(Debug)]
pub struct SubmissionClient {
    inner: api::SubmissionClient,
    runtime: tokio::runtime::Runtime,
}

impl SubmissionClient {
    /// Start the runtime and create the underlying async client.
    ///
    /// Fails with [`ClientError::Runtime`] if the runtime cannot start and
    /// with [`ClientError::Config`] if `config` does not validate.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("sparkrest-blocking")
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;

        let inner = {
            let _guard = runtime.enter();
            api::SubmissionClient::new(config)?
        };

        Ok(Self { inner, runtime })
    }

    /// Configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    /// Base HTTP URL, e.g. `http://master:6066`.
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Blocking form of [`api::SubmissionClient::submit`].
    pub fn submit(
        &self,
        app_resource: &str,
        spark_properties: BTreeMap<String, String>,
    ) -> Result<ApiResponse<SubmissionResult>, ClientError> {
        self.runtime
            .block_on(self.inner.submit(app_resource, spark_properties))
    }

    /// Blocking form of [`api::SubmissionClient::submit_with`].
    pub fn submit_with(
        &self,
        options: &SubmitOptions,
    ) -> Result<ApiResponse<SubmissionResult>, ClientError> {
        self.runtime.block_on(self.inner.submit_with(options))
    }

    /// Blocking form of [`api::SubmissionClient::status`]; the id is
    /// truncated at its first `/`.
    pub fn status(&self, driver_id: &str) -> Result<ApiResponse<StatusResult>, ClientError> {
        self.runtime.block_on(self.inner.status(driver_id))
    }

    /// Blocking form of [`api::SubmissionClient::kill`]; the id is
    /// truncated at its first `/`.
    pub fn kill(&self, driver_id: &str) -> Result<ApiResponse<KillResult>, ClientError> {
        self.runtime.block_on(self.inner.kill(driver_id))
    }
}
