//! The external model checker seam.
//!
//! [`ModelChecker`] takes a generated checker document and returns either a
//! [`ResultRecord`] or [`CheckOutcome::Skipped`] when the user interrupted
//! that one run. [`TlcChecker`] drives the real TLC; tests plug in their own.

pub mod document;
pub mod output;
pub mod tlc;

pub use document::{CheckerDocument, ConstantValue, CONFIG_TEMPLATE, DEFERRED_SYMBOLS};
pub use tlc::{ctrl_c, InterruptSource, TlcChecker};

use crate::experiment::ExperimentConfig;
use crate::BatchResult;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Terminal status of one TLC run, from its exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitState {
    Success,
    AssumptionViolation,
    Deadlock,
    SafetyViolation,
    LivenessViolation,
    AssertionFailure,
    SpecParseError,
    ConfigParseError,
    StateSpaceTooLarge,
    SystemError,
    Failure(i32),
}

impl ExitState {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ExitState::Success,
            10 => ExitState::AssumptionViolation,
            11 => ExitState::Deadlock,
            12 => ExitState::SafetyViolation,
            13 => ExitState::LivenessViolation,
            14 => ExitState::AssertionFailure,
            75 => ExitState::SpecParseError,
            76 => ExitState::ConfigParseError,
            77 => ExitState::StateSpaceTooLarge,
            150 => ExitState::SystemError,
            other => ExitState::Failure(other),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitState::Success)
    }
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Success => f.write_str("success"),
            ExitState::AssumptionViolation => f.write_str("assumption violation"),
            ExitState::Deadlock => f.write_str("deadlock reached"),
            ExitState::SafetyViolation => f.write_str("safety violation"),
            ExitState::LivenessViolation => f.write_str("liveness violation"),
            ExitState::AssertionFailure => f.write_str("assertion failure"),
            ExitState::SpecParseError => f.write_str("spec parse error"),
            ExitState::ConfigParseError => f.write_str("config parse error"),
            ExitState::StateSpaceTooLarge => f.write_str("state space too large"),
            ExitState::SystemError => f.write_str("system error"),
            ExitState::Failure(code) => write!(f, "failure (exit code {})", code),
        }
    }
}

/// Output of one completed checker run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub start_time: NaiveDateTime,
    pub elapsed: Duration,
    pub diameter: u64,
    pub total_states: u64,
    pub distinct_states: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub exit_state: ExitState,
}

/// Result of asking the checker to run one experiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Completed(ResultRecord),
    /// The user interrupted this run; the batch carries on
    Skipped,
}

/// Runs one experiment against an external checker
#[async_trait]
pub trait ModelChecker: Send + Sync {
    /// Check one experiment described by `document`.
    ///
    /// Interrupting the run yields `Ok(CheckOutcome::Skipped)`; any other
    /// failure to run the checker is an error and ends the batch.
    async fn check(
        &self,
        document: &str,
        experiment: &ExperimentConfig,
    ) -> BatchResult<CheckOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_state_codes() {
        assert_eq!(ExitState::from_code(0), ExitState::Success);
        assert_eq!(ExitState::from_code(12), ExitState::SafetyViolation);
        assert_eq!(ExitState::from_code(3), ExitState::Failure(3));
        assert!(ExitState::from_code(0).is_success());
        assert!(!ExitState::from_code(11).is_success());
    }

    #[test]
    fn test_exit_state_tags() {
        assert_eq!(ExitState::Deadlock.to_string(), "deadlock reached");
        assert_eq!(ExitState::Failure(255).to_string(), "failure (exit code 255)");
    }
}
