//! stemcheck library exports.
//!
//! Compliance checks for FIPS-hardened Ubuntu stemcell images: kernel
//! packages, sshd hardening, grub entries and the exact installed package
//! set for the image's platform.

pub mod assets;
pub mod checks;
pub mod commands;
pub mod config;
pub mod error;
pub mod packages;
pub mod platform;
pub mod preflight;
pub mod process;
pub mod reconcile;
pub mod scenario;
pub mod suite;
pub mod target;

pub use error::CheckError;
pub use packages::{normalize, PackageSet};
pub use platform::Platform;
pub use reconcile::{reconcile, ReconciliationResult};
