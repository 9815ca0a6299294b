//! Expected versus observed package set comparison.

use serde::Serialize;

use crate::error::CheckError;
use crate::packages::PackageSet;

/// Outcome of comparing two package sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum ReconciliationResult {
    Match,
    Mismatch {
        /// Expected but not observed.
        missing: PackageSet,
        /// Observed but not expected.
        extra: PackageSet,
    },
}

impl ReconciliationResult {
    pub fn is_match(&self) -> bool {
        matches!(self, ReconciliationResult::Match)
    }

    /// Convert into a check outcome.
    pub fn into_result(self) -> Result<(), CheckError> {
        match self {
            ReconciliationResult::Match => Ok(()),
            ReconciliationResult::Mismatch { missing, extra } => {
                Err(CheckError::PackageMismatch { missing, extra })
            }
        }
    }
}

/// Compare as sets; order and duplicates are irrelevant.
pub fn reconcile(expected: &PackageSet, observed: &PackageSet) -> ReconciliationResult {
    let missing = expected.difference(observed);
    let extra = observed.difference(expected);

    if missing.is_empty() && extra.is_empty() {
        ReconciliationResult::Match
    } else {
        ReconciliationResult::Mismatch { missing, extra }
    }
}
