//! Check result types.

use serde::Serialize;

use crate::error::CheckError;

/// Result of a single check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckResult {
    pub fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            summary: None,
            details: None,
        }
    }

    pub fn pass_with(name: &str, summary: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            ..Self::pass(name)
        }
    }

    pub fn fail_with(name: &str, summary: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            summary: Some(summary.to_string()),
            details: None,
        }
    }

    pub fn fail(name: &str, error: &CheckError) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            summary: Some(error.to_string()),
            details: error.details(),
        }
    }

    pub fn from_outcome(name: &str, outcome: Result<(), CheckError>) -> Self {
        match outcome {
            Ok(()) => Self::pass(name),
            Err(e) => Self::fail(name, &e),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}
