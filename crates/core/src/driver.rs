//! Driver identifiers and driver-state names reported by the Spark master.

use std::fmt;

/// Spark master reports a submitted driver that has not been scheduled yet.
pub const STATE_SUBMITTED: &str = "SUBMITTED";

/// The driver is running on a worker.
pub const STATE_RUNNING: &str = "RUNNING";

/// The driver exited normally.
pub const STATE_FINISHED: &str = "FINISHED";

/// The driver is being relaunched after its worker was lost.
pub const STATE_RELAUNCHING: &str = "RELAUNCHING";

/// The master lost track of the driver.
pub const STATE_UNKNOWN: &str = "UNKNOWN";

/// The driver was killed on request.
pub const STATE_KILLED: &str = "KILLED";

/// The driver exited with a non-zero code.
pub const STATE_FAILED: &str = "FAILED";

/// The driver could not be launched.
pub const STATE_ERROR: &str = "ERROR";

/// Normalize a driver id before it is placed in a request path.
///
/// Keeps only the part before the first `/`, so ids that arrive embedded
/// in a larger path-like string (`driver-0001/extra/segments`) address the
/// same driver as the bare id.
pub fn normalize_driver_id(driver_id: &str) -> &str {
    match driver_id.split_once('/') {
        Some((head, _)) => head,
        None => driver_id,
    }
}

/// Typed view over the `driverState` string.
///
/// The wire value is kept verbatim on the status record; this enum is only
/// a convenience for callers that branch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    Submitted,
    Running,
    Finished,
    Relaunching,
    Unknown,
    Killed,
    Failed,
    Error,
    /// Any value this client does not know about.
    Other(String),
}

impl DriverState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            STATE_SUBMITTED => Self::Submitted,
            STATE_RUNNING => Self::Running,
            STATE_FINISHED => Self::Finished,
            STATE_RELAUNCHING => Self::Relaunching,
            STATE_UNKNOWN => Self::Unknown,
            STATE_KILLED => Self::Killed,
            STATE_FAILED => Self::Failed,
            STATE_ERROR => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Submitted => STATE_SUBMITTED,
            Self::Running => STATE_RUNNING,
            Self::Finished => STATE_FINISHED,
            Self::Relaunching => STATE_RELAUNCHING,
            Self::Unknown => STATE_UNKNOWN,
            Self::Killed => STATE_KILLED,
            Self::Failed => STATE_FAILED,
            Self::Error => STATE_ERROR,
            Self::Other(raw) => raw,
        }
    }

    /// Whether the driver has stopped and will not change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Killed | Self::Failed | Self::Error
        )
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
