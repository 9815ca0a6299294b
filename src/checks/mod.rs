//! Individual stemcell checks.
//!
//! Each check is a function returning `Result<(), CheckError>`. Text checks
//! are pure predicates over fetched content; the suite does the fetching.

pub mod grub;
pub mod kernel;
pub mod packages;
pub mod ssh;
mod types;

pub use types::{CheckResult, CheckStatus};
