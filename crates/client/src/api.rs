//! REST API client for the Spark master submission endpoints.
//!
//! Wraps `POST /v1/submissions/create`, `GET /v1/submissions/status/{id}`
//! and `POST /v1/submissions/kill/{id}` using [`reqwest`].

use std::collections::BTreeMap;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use sparkrest_core::driver::normalize_driver_id;
use sparkrest_core::submission::{
    CreateSubmissionRequest, KillResult, StatusResult, SubmissionResult, SubmitOptions,
};
use sparkrest_core::ClientConfig;

use crate::error::ClientError;
use crate::response::ApiResponse;

/// Content type sent on every request, bodiless ones included.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

pub const CREATE_PATH: &str = "/v1/submissions/create";
pub const STATUS_PATH: &str = "/v1/submissions/status";
pub const KILL_PATH: &str = "/v1/submissions/kill";

/// HTTP client for a single Spark master REST endpoint.
///
/// Holds one pooled [`reqwest::Client`] for the configured host, port and
/// scheme. At most `max_connections` requests are in flight at once;
/// further callers wait for a free slot. Share it behind an `Arc` to call
/// it from several tasks.
#[derive(Debug)]
pub struct SubmissionClient {
    client: reqwest::Client,
    config: ClientConfig,
    base_url: String,
    slots: Semaphore,
}

impl SubmissionClient {
    /// Create a client for the master described by `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(config.max_connections);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = config.base_url();
        tracing::info!(
            base_url = %base_url,
            max_connections = config.max_connections,
            "Spark REST client ready",
        );

        Ok(Self {
            client,
            slots: Semaphore::new(config.max_connections),
            base_url,
            config,
        })
    }

    /// Configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base HTTP URL, e.g. `http://master:6066`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a driver with the default main class, no environment and no arguments.
    pub async fn submit(
        &self,
        app_resource: &str,
        spark_properties: BTreeMap<String, String>,
    ) -> Result<ApiResponse<SubmissionResult>, ClientError> {
        self.submit_with(&SubmitOptions::new(app_resource, spark_properties)).await
    }

    /// Submit a driver.
    ///
    /// Sends `POST /v1/submissions/create` tagged with this client's Spark
    /// version. On success the record carries the `submission_id` used by
    /// [`status`](Self::status) and [`kill`](Self::kill).
    pub async fn submit_with(
        &self,
        options: &SubmitOptions,
    ) -> Result<ApiResponse<SubmissionResult>, ClientError> {
        let body = CreateSubmissionRequest::new(options, &self.config.spark_version);
        let request = self.request(Method::POST, CREATE_PATH).json(&body);

        self.execute(request, Method::POST, CREATE_PATH).await
    }

    /// Fetch the state of a driver.
    ///
    /// Sends `GET /v1/submissions/status/{id}`. Anything after the first
    /// `/` in `driver_id` is dropped.
    pub async fn status(&self, driver_id: &str) -> Result<ApiResponse<StatusResult>, ClientError> {
        let path = format!("{STATUS_PATH}/{}", normalize_driver_id(driver_id));
        let request = self.request(Method::GET, &path);

        self.execute(request, Method::GET, &path).await
    }

    /// Ask the master to kill a driver.
    ///
    /// Sends a bodiless `POST /v1/submissions/kill/{id}`, normalizing the
    /// id like [`status`](Self::status).
    pub async fn kill(&self, driver_id: &str) -> Result<ApiResponse<KillResult>, ClientError> {
        let path = format!("{KILL_PATH}/{}", normalize_driver_id(driver_id));
        let request = self.request(Method::POST, &path);

        self.execute(request, Method::POST, &path).await
    }

    // ---- private helpers ----

    /// Start a request to `path` with the JSON content type already set.
    ///
    /// `RequestBuilder::json` keeps an existing `Content-Type`, so the
    /// charset suffix survives on submit.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
    }

    /// Send a request while holding a connection slot and decode the reply.
    ///
    /// The slot is held until the body has been read, so `max_connections`
    /// bounds whole round trips.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<ApiResponse<T>, ClientError> {
        let _slot = self.slots.acquire().await?;

        tracing::debug!(%method, path, "Sending Spark REST request");
        let response = request.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            tracing::debug!(%method, path, status = %status, "Spark REST request succeeded");
        } else {
            tracing::warn!(%method, path, status = %status, "Spark master returned non-success status");
        }

        ApiResponse::decode(status, headers, body)
    }
}
