//! Outcome of a single adapter run.
//!
//! A run either yields a [`Metrics`] mapping or one of three failures.
//! Harnesses that still speak the integer protocol can use
//! [`MethodError::code`] to recover the sentinel values.

use crate::metrics::Metrics;
use std::time::Duration;
use thiserror::Error;

/// Sentinel code for a run that exceeded its timeout.
pub const TIMEOUT_CODE: i32 = -2;

/// Sentinel code for an execution or parse failure.
pub const FAILURE_CODE: i32 = -1;

/// Errors a benchmark method can report for one run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MethodError {
    /// The executable did not finish within the configured timeout.
    #[error("Command timed out after {timeout:?}")]
    Timeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The executable could not be launched or exited abnormally.
    #[error("Could not execute command: {command}: {reason}")]
    ExecutionFailure {
        /// Rendered argument vector of the attempted command.
        command: String,
        /// What went wrong.
        reason: String,
    },

    /// The captured output did not contain the expected timer data.
    #[error("Can't parse the data: {reason}")]
    ParseFailure {
        /// Why the output was rejected.
        reason: String,
    },
}

impl MethodError {
    /// Legacy sentinel code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            Self::Timeout { .. } => TIMEOUT_CODE,
            Self::ExecutionFailure { .. } | Self::ParseFailure { .. } => FAILURE_CODE,
        }
    }

    /// Whether the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result of running a benchmark method once.
pub type RunOutcome = std::result::Result<Metrics, MethodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_codes() {
        let timeout = MethodError::Timeout {
            timeout: Duration::from_secs(1),
        };
        let exec = MethodError::ExecutionFailure {
            command: "allknn -r a.csv".to_string(),
            reason: "exit status: 1".to_string(),
        };
        let parse = MethodError::ParseFailure {
            reason: "wrong format".to_string(),
        };

        assert_eq!(timeout.code(), -2);
        assert_eq!(exec.code(), -1);
        assert_eq!(parse.code(), -1);
        assert!(timeout.is_timeout());
        assert!(!parse.is_timeout());
    }

    #[test]
    fn test_execution_failure_message_names_command() {
        let err = MethodError::ExecutionFailure {
            command: "allknn -r a.csv".to_string(),
            reason: "not found".to_string(),
        };
        assert!(err.to_string().contains("allknn -r a.csv"));
    }
}
