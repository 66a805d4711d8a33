use std::time::Duration;

use crate::error::CoreError;

/// Default REST port of a Spark standalone master.
pub const DEFAULT_PORT: u16 = 6066;

/// Default number of concurrent connections to the master.
pub const DEFAULT_MAX_CONNECTIONS: usize = 1;

/// Connection settings for one Spark master REST endpoint.
///
/// Create with [`ClientConfig::new`] and adjust with the `with_*` methods,
/// or load from the environment with [`ClientConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Master hostname or IP address.
    pub host: String,
    /// REST port (default: `6066`).
    pub port: u16,
    /// Use `https` instead of `http` (default: `false`).
    pub secure: bool,
    /// Upper bound on in-flight requests and pooled idle connections (default: `1`).
    pub max_connections: usize,
    /// Spark version this client reports on submissions (`clientSparkVersion`).
    pub spark_version: String,
    /// Per-request timeout; `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Config for `host` on the default port over plain http, with one
    /// connection and no request timeout.
    pub fn new(host: impl Into<String>, spark_version: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            secure: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            spark_version: spark_version.into(),
            request_timeout: None,
        }
    }

    /// Set the REST port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Switch between `https` and `http`.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the connection bound. Zero fails [`validate`](Self::validate).
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Bound every request, including reading the body, by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// `"https"` when secure, `"http"` otherwise.
    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Base URL every request path is appended to, e.g. `http://master:6066`.
    ///
    /// IPv6 literals are bracketed: `::1` becomes `http://[::1]:6066`.
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}", self.scheme(), self.host, self.port)
        } else {
            format!("{}://{}:{}", self.scheme(), self.host, self.port)
        }
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Validation("host must not be empty".to_string()));
        }
        if self.spark_version.trim().is_empty() {
            return Err(CoreError::Validation(
                "spark_version must not be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(CoreError::Validation(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                      | Default  |
    /// |------------------------------|----------|
    /// | `SPARK_MASTER_HOST`          | required |
    /// | `SPARK_MASTER_REST_PORT`     | `6066`   |
    /// | `SPARK_MASTER_SECURE`        | `false`  |
    /// | `SPARK_REST_MAX_CONNECTIONS` | `1`      |
    /// | `SPARK_CLIENT_VERSION`       | required |
    /// | `SPARK_REST_TIMEOUT_SECS`    | unset    |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SPARK_MASTER_HOST")
            .ok_or_else(|| CoreError::Config("SPARK_MASTER_HOST must be set".to_string()))?;

        let spark_version = lookup("SPARK_CLIENT_VERSION")
            .ok_or_else(|| CoreError::Config("SPARK_CLIENT_VERSION must be set".to_string()))?;

        let port: u16 = match lookup("SPARK_MASTER_REST_PORT") {
            Some(v) => v.trim().parse().map_err(|_| {
                CoreError::Config(format!("SPARK_MASTER_REST_PORT must be a valid u16, got '{v}'"))
            })?,
            None => DEFAULT_PORT,
        };

        let secure = match lookup("SPARK_MASTER_SECURE") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                CoreError::Config(format!("SPARK_MASTER_SECURE must be a boolean, got '{v}'"))
            })?,
            None => false,
        };

        let max_connections: usize = match lookup("SPARK_REST_MAX_CONNECTIONS") {
            Some(v) => v.trim().parse().map_err(|_| {
                CoreError::Config(format!(
                    "SPARK_REST_MAX_CONNECTIONS must be a valid usize, got '{v}'"
                ))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let request_timeout = match lookup("SPARK_REST_TIMEOUT_SECS") {
            Some(v) => Some(Duration::from_secs(v.trim().parse().map_err(|_| {
                CoreError::Config(format!("SPARK_REST_TIMEOUT_SECS must be a valid u64, got '{v}'"))
            })?)),
            None => None,
        };

        let config = Self {
            host,
            port,
            secure,
            max_connections,
            spark_version,
            request_timeout,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
