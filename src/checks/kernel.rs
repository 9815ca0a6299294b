//! FIPS kernel package presence checks.

use tracing::debug;

use crate::error::CheckError;
use crate::target::CommandExecutor;

/// A kernel package and whether it must be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelExpectation {
    pub package: &'static str,
    pub installed: bool,
}

/// The FIPS kernel replaces the HWE and generic kernels.
pub const KERNEL_EXPECTATIONS: [KernelExpectation; 3] = [
    KernelExpectation {
        package: "linux-image-fips",
        installed: true,
    },
    KernelExpectation {
        package: "linux-generic-hwe-22.04",
        installed: false,
    },
    KernelExpectation {
        package: "linux-image-5.19.0-109-generic",
        installed: false,
    },
];

/// dpkg status of a package, or `None` if dpkg has no record of it.
pub fn package_status(
    exec: &dyn CommandExecutor,
    package: &str,
) -> Result<Option<String>, CheckError> {
    let out = exec
        .execute("dpkg-query", &["-W", "-f=${Status}", package])
        .map_err(|e| CheckError::fetch(format!("dpkg status of {}", package), e))?;

    if !out.success() {
        debug!(package, stderr = %out.stderr.trim(), "dpkg-query has no record");
        return Ok(None);
    }
    Ok(Some(out.stdout.trim().to_string()))
}

/// Installed means `install ok installed` or `hold ok installed`.
pub fn is_installed_status(status: &str) -> bool {
    matches!(status, "install ok installed" | "hold ok installed")
}

pub fn check_kernel_package(
    exec: &dyn CommandExecutor,
    expectation: &KernelExpectation,
) -> Result<(), CheckError> {
    let status = package_status(exec, expectation.package)?;
    let installed = status.as_deref().is_some_and(is_installed_status);

    if installed == expectation.installed {
        return Ok(());
    }

    Err(CheckError::KernelPackage {
        package: expectation.package.to_string(),
        expectation: if expectation.installed {
            "installed"
        } else {
            "not installed"
        },
        status: status.unwrap_or_else(|| "unknown".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_statuses() {
        assert!(is_installed_status("install ok installed"));
        assert!(is_installed_status("hold ok installed"));
        assert!(!is_installed_status("deinstall ok config-files"));
        assert!(!is_installed_status("install ok half-installed"));
        assert!(!is_installed_status(""));
    }

    #[test]
    fn test_expectations_require_fips_image_only() {
        let required: Vec<_> = KERNEL_EXPECTATIONS
            .iter()
            .filter(|e| e.installed)
            .map(|e| e.package)
            .collect();
        assert_eq!(required, ["linux-image-fips"]);
    }
}
