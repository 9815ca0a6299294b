//! Error types for stemcell checks.

use std::path::PathBuf;

use thiserror::Error;

use crate::packages::PackageSet;
use crate::platform::Platform;

/// Failure of a single check.
///
/// Every variant is scoped to the check that produced it. The suite records
/// the error against that check and moves on to the next one.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A reference package list is missing from the asset store.
    #[error("package list '{name}' not found at {}", .path.display())]
    AssetNotFound {
        /// Asset name as requested by the scenario.
        name: String,
        /// Where the store looked for it.
        path: PathBuf,
    },

    /// Installed packages differ from the expected set.
    #[error("package set mismatch: {} missing, {} extra", .missing.len(), .extra.len())]
    PackageMismatch {
        /// Expected but not installed.
        missing: PackageSet,
        /// Installed but not expected.
        extra: PackageSet,
    },

    /// Fetched text did not satisfy a pattern assertion.
    #[error("{path}: {reason}")]
    PatternMismatch {
        /// File inside the image.
        path: String,
        /// What was expected.
        reason: String,
        /// The non-matching text that was observed.
        observed: String,
    },

    /// A kernel package is present when it must be absent, or the reverse.
    #[error("package '{package}' should be {expectation}, dpkg reports '{status}'")]
    KernelPackage {
        package: String,
        /// "installed" or "not installed".
        expectation: &'static str,
        /// dpkg status text, or "unknown" when dpkg has no record.
        status: String,
    },

    /// The platform is not covered by any scenario.
    #[error("no package scenario applies to platform '{platform}'")]
    NoScenarioApplicable {
        /// The platform reported by the orchestration context.
        platform: Platform,
    },

    /// A command or file read against the target failed.
    #[error("failed to fetch {what}: {source:#}")]
    Fetch {
        /// What was being fetched.
        what: String,
        #[source]
        source: anyhow::Error,
    },
}

impl CheckError {
    pub fn fetch(what: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Fetch {
            what: what.into(),
            source,
        }
    }

    /// Multi-line detail for the report, beyond the one-line summary.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::PackageMismatch { missing, extra } => {
                let mut out = String::new();
                for name in missing.iter() {
                    out.push_str(&format!("- {}\n", name));
                }
                for name in extra.iter() {
                    out.push_str(&format!("+ {}\n", name));
                }
                Some(out.trim_end().to_string())
            }
            Self::PatternMismatch { observed, .. } if !observed.is_empty() => {
                Some(format!("observed: {}", observed))
            }
            _ => None,
        }
    }
}

/// The scenario matrix does not partition the platform set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("platform '{0}' is not covered by any scenario")]
    Uncovered(Platform),

    #[error("platform '{platform}' is covered by both '{first}' and '{second}'")]
    Overlap {
        platform: Platform,
        first: String,
        second: String,
    },
}
