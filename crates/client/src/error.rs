use sparkrest_core::CoreError;

/// Errors from the Spark master REST client.
///
/// A non-2xx status is not an error for the client operations; it only
/// surfaces as [`ClientError::Status`] through
/// [`ApiResponse::into_result`](crate::ApiResponse::into_result).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connection refused, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A 2xx response carried a body that is not the expected JSON object.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The master answered with a non-2xx status.
    #[error("Spark master returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    #[error(transparent)]
    Config(#[from] CoreError),

    /// The connection limiter was closed while a request waited for it.
    #[error("Connection limiter closed")]
    LimiterClosed(#[from] tokio::sync::AcquireError),

    /// The blocking client could not start its runtime.
    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
