//! Installed package set check.

use tracing::info;

use crate::assets::PackageSetLoader;
use crate::error::CheckError;
use crate::packages::{self, PackageSet};
use crate::platform::Platform;
use crate::reconcile::reconcile;
use crate::scenario::ScenarioMatrix;
use crate::target::CommandExecutor;

/// Normalized names of every package selection on the target.
pub fn installed_packages(exec: &dyn CommandExecutor) -> Result<PackageSet, CheckError> {
    let out = exec
        .execute("dpkg", &["--get-selections"])
        .map_err(|e| CheckError::fetch("dpkg selections", e))?;

    if !out.success() {
        return Err(CheckError::fetch(
            "dpkg selections",
            anyhow::anyhow!("dpkg exited with {}: {}", out.exit_code, out.stderr.trim()),
        ));
    }

    Ok(packages::observed_packages(&out.stdout))
}

/// Compare installed packages against the scenario for `platform`.
pub fn check_installed_packages(
    exec: &dyn CommandExecutor,
    loader: &dyn PackageSetLoader,
    matrix: &ScenarioMatrix,
    platform: Platform,
    os: &str,
) -> Result<(), CheckError> {
    let scenario = matrix.active(platform)?;
    info!(%platform, scenario = %scenario.name, "comparing installed packages");

    let expected = scenario.expected(loader, os)?;
    let observed = installed_packages(exec)?;

    reconcile(&expected, &observed).into_result()
}
