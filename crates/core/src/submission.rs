//! Wire records for the Spark master `/v1/submissions` REST endpoints.
//!
//! The master speaks camelCase JSON. Response records decode leniently:
//! every field is optional, so a missing or `null` key becomes `None` and
//! unknown keys are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::driver::DriverState;

/// Entry point used when the caller does not name one.
pub const DEFAULT_MAIN_CLASS: &str = "org.apache.spark.deploy.SparkSubmit";

/// `action` tag the master expects on a create request.
pub const CREATE_SUBMISSION_ACTION: &str = "CreateSubmissionRequest";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Everything a caller controls about a single submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOptions {
    /// Location of the application jar or script, e.g. `hdfs:///apps/job.jar`.
    pub app_resource: String,
    pub spark_properties: BTreeMap<String, String>,
    pub main_class: String,
    pub environment_variables: BTreeMap<String, String>,
    pub app_args: Vec<String>,
}

impl SubmitOptions {
    pub fn new(
        app_resource: impl Into<String>,
        spark_properties: BTreeMap<String, String>,
    ) -> Self {
        Self {
            app_resource: app_resource.into(),
            spark_properties,
            main_class: DEFAULT_MAIN_CLASS.to_string(),
            environment_variables: BTreeMap::new(),
            app_args: Vec::new(),
        }
    }

    pub fn with_main_class(mut self, main_class: impl Into<String>) -> Self {
        self.main_class = main_class.into();
        self
    }

    pub fn with_environment_variables(mut self, env: BTreeMap<String, String>) -> Self {
        self.environment_variables = env;
        self
    }

    pub fn with_app_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.app_args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// JSON body of `POST /v1/submissions/create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest<'a> {
    pub app_resource: &'a str,
    pub spark_properties: &'a BTreeMap<String, String>,
    pub client_spark_version: &'a str,
    pub main_class: &'a str,
    pub environment_variables: &'a BTreeMap<String, String>,
    pub action: &'static str,
    pub app_args: &'a [String],
}

impl<'a> CreateSubmissionRequest<'a> {
    /// Build the request body, tagging it with the client's Spark version.
    pub fn new(options: &'a SubmitOptions, client_spark_version: &'a str) -> Self {
        Self {
            app_resource: &options.app_resource,
            spark_properties: &options.spark_properties,
            client_spark_version,
            main_class: &options.main_class,
            environment_variables: &options.environment_variables,
            action: CREATE_SUBMISSION_ACTION,
            app_args: &options.app_args,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Body returned by `POST /v1/submissions/create`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionResult {
    pub action: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "serverSparkVersion")]
    pub server_version: Option<String>,
    /// Driver id to use with the status and kill endpoints.
    #[serde(rename = "submissionId")]
    pub submission_id: Option<String>,
    pub success: Option<bool>,
}

/// Body returned by `GET /v1/submissions/status/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusResult {
    pub action: Option<String>,
    /// Server-defined state name, passed through verbatim.
    #[serde(rename = "driverState")]
    pub driver_state: Option<String>,
    #[serde(rename = "serverSparkVersion")]
    pub server_version: Option<String>,
    #[serde(rename = "submissionId")]
    pub submission_id: Option<String>,
    pub success: Option<bool>,
    #[serde(rename = "workerHostPort")]
    pub worker_host_port: Option<String>,
    #[serde(rename = "workerId")]
    pub worker_id: Option<String>,
}

impl StatusResult {
    /// Typed view of [`driver_state`](Self::driver_state), if present.
    pub fn state(&self) -> Option<DriverState> {
        self.driver_state.as_deref().map(DriverState::parse)
    }
}

/// Body returned by `POST /v1/submissions/kill/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillResult {
    pub action: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "serverSparkVersion")]
    pub server_version: Option<String>,
    #[serde(rename = "submissionId")]
    pub submission_id: Option<String>,
    pub success: Option<bool>,
}

/// Body the master sends when it rejects a request (`action: "ErrorResponse"`).
///
/// Only ever read from non-2xx responses, and only on a best-effort basis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorResponse {
    pub action: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "serverSparkVersion")]
    pub server_version: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("spark.app.name".to_string(), "wordcount".to_string()),
            ("spark.master".to_string(), "spark://master:7077".to_string()),
        ])
    }

    #[test]
    fn submit_options_defaults() {
        let opts = SubmitOptions::new("hdfs:///apps/job.jar", props());
        assert_eq!(opts.main_class, DEFAULT_MAIN_CLASS);
        assert!(opts.environment_variables.is_empty());
        assert!(opts.app_args.is_empty());
    }

    #[test]
    fn create_request_serializes_wire_names() {
        let opts = SubmitOptions::new("hdfs:///apps/job.jar", props())
            .with_main_class("com.example.WordCount")
            .with_app_args(["in.txt", "out"]);
        let body = serde_json::to_value(CreateSubmissionRequest::new(&opts, "3.5.1")).unwrap();

        assert_eq!(body["appResource"], "hdfs:///apps/job.jar");
        assert_eq!(body["sparkProperties"]["spark.app.name"], "wordcount");
        assert_eq!(body["clientSparkVersion"], "3.5.1");
        assert_eq!(body["mainClass"], "com.example.WordCount");
        assert_eq!(body["action"], "CreateSubmissionRequest");
        assert_eq!(body["appArgs"], serde_json::json!(["in.txt", "out"]));
        assert_eq!(body.as_object().unwrap().len(), 7);
    }

    #[test]
    fn create_request_defaults_to_empty_env_and_args() {
        let opts = SubmitOptions::new("local:///job.py", BTreeMap::new());
        let body = serde_json::to_value(CreateSubmissionRequest::new(&opts, "3.5.1")).unwrap();

        assert_eq!(body["environmentVariables"], serde_json::json!({}));
        assert_eq!(body["appArgs"], serde_json::json!([]));
        assert_eq!(body["mainClass"], DEFAULT_MAIN_CLASS);
    }

    #[test]
    fn decode_submission_result() {
        let json = r#"{
            "action": "CreateSubmissionResponse",
            "message": "Driver successfully submitted as driver-20240101000000-0001",
            "serverSparkVersion": "3.5.1",
            "submissionId": "driver-20240101000000-0001",
            "success": true
        }"#;
        let result: SubmissionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.action.as_deref(), Some("CreateSubmissionResponse"));
        assert_eq!(
            result.submission_id.as_deref(),
            Some("driver-20240101000000-0001")
        );
        assert_eq!(result.server_version.as_deref(), Some("3.5.1"));
        assert_eq!(result.success, Some(true));
    }

    #[test]
    fn decode_status_missing_worker_fields() {
        let json = r#"{
            "action": "SubmissionStatusResponse",
            "driverState": "SUBMITTED",
            "serverSparkVersion": "3.5.1",
            "submissionId": "driver-0001",
            "success": true
        }"#;
        let result: StatusResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.driver_state.as_deref(), Some("SUBMITTED"));
        assert!(result.worker_host_port.is_none());
        assert!(result.worker_id.is_none());
        assert_eq!(result.state(), Some(DriverState::Submitted));
    }

    #[test]
    fn decode_status_null_fields_and_unknown_keys() {
        let json = r#"{"driverState": null, "workerId": "worker-1", "extra": 42}"#;
        let result: StatusResult = serde_json::from_str(json).unwrap();
        assert!(result.driver_state.is_none());
        assert!(result.state().is_none());
        assert_eq!(result.worker_id.as_deref(), Some("worker-1"));
    }

    #[test]
    fn decode_empty_object_yields_all_none() {
        let result: KillResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result, KillResult::default());
    }

    #[test]
    fn decode_non_object_fails() {
        assert!(serde_json::from_str::<KillResult>("[1, 2]").is_err());
        assert!(serde_json::from_str::<KillResult>("not json").is_err());
    }

    #[test]
    fn decode_error_response() {
        let json = r#"{"action":"ErrorResponse","message":"Unknown protocol version","serverSparkVersion":"3.5.1"}"#;
        let err: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.action.as_deref(), Some("ErrorResponse"));
        assert_eq!(err.message.as_deref(), Some("Unknown protocol version"));
    }
}
