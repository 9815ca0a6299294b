//! The FIPS stemcell suite.
//!
//! Runs every check against a target and collects the results. A failing
//! check never stops the ones after it.

use serde::Serialize;
use tracing::{info, warn};

use crate::assets::PackageSetLoader;
use crate::checks::grub::{self, GRUB_CONFIG};
use crate::checks::kernel::{self, KERNEL_EXPECTATIONS};
use crate::checks::packages;
use crate::checks::ssh::{self, SSHD_CONFIG};
use crate::checks::{CheckResult, CheckStatus};
use crate::error::CheckError;
use crate::platform::Platform;
use crate::scenario::ScenarioMatrix;
use crate::target::{FileAccess, Target};

/// Suite configuration.
#[derive(Debug, Clone)]
pub struct Suite {
    matrix: ScenarioMatrix,
    os: String,
}

impl Suite {
    pub fn new(matrix: ScenarioMatrix, os: &str) -> Self {
        Self {
            matrix,
            os: os.to_string(),
        }
    }

    /// Run all checks for `platform`.
    pub fn run<T: Target>(
        &self,
        target: &T,
        loader: &dyn PackageSetLoader,
        platform: Platform,
    ) -> SuiteReport {
        info!(%platform, os = %self.os, "running stemcell suite");
        let mut checks = Vec::new();

        for expectation in &KERNEL_EXPECTATIONS {
            let name = if expectation.installed {
                format!("kernel: {} installed", expectation.package)
            } else {
                format!("kernel: {} not installed", expectation.package)
            };
            checks.push(CheckResult::from_outcome(
                &name,
                kernel::check_kernel_package(target, expectation),
            ));
        }

        match read_file(target, SSHD_CONFIG) {
            Ok(content) => {
                checks.push(CheckResult::from_outcome(
                    "sshd: secure MACs only",
                    ssh::check_macs(&content),
                ));
                checks.push(CheckResult::from_outcome(
                    "sshd: RSA and ECDSA host keys",
                    ssh::check_host_keys(&content),
                ));
            }
            Err(e) => {
                checks.push(CheckResult::fail("sshd: secure MACs only", &e));
                checks.push(CheckResult::fail("sshd: RSA and ECDSA host keys", &e));
            }
        }

        let grub_outcome = if target.is_file(GRUB_CONFIG) {
            read_file(target, GRUB_CONFIG).and_then(|content| grub::check_grub(&content))
        } else {
            Err(CheckError::PatternMismatch {
                path: GRUB_CONFIG.to_string(),
                reason: "not a regular file".to_string(),
                observed: String::new(),
            })
        };
        checks.push(CheckResult::from_outcome("grub: boots FIPS kernel", grub_outcome));

        let scenario = self.matrix.active(platform).ok().map(|s| s.name.clone());
        checks.push(CheckResult::from_outcome(
            &format!("packages: {} set", scenario.as_deref().unwrap_or("unknown")),
            packages::check_installed_packages(target, loader, &self.matrix, platform, &self.os),
        ));

        let report = SuiteReport {
            platform,
            scenario,
            checks,
        };
        if report.all_passed() {
            info!("all checks passed");
        } else {
            warn!(failed = report.fail_count(), "stemcell suite failed");
        }
        report
    }
}

fn read_file(target: &dyn FileAccess, path: &str) -> Result<String, CheckError> {
    target
        .read_to_string(path)
        .map_err(|e| CheckError::fetch(path, e))
}

/// Results of a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub platform: Platform,
    pub scenario: Option<String>,
    pub checks: Vec<CheckResult>,
}

impl SuiteReport {
    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    pub fn fail_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count()
    }

    /// Look up a check by name.
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== FIPS Stemcell Results ({}) ===\n", self.platform);

        for check in &self.checks {
            let (icon, status_str) = match check.status {
                CheckStatus::Pass => ("✓", "PASS"),
                CheckStatus::Fail => ("✗", "FAIL"),
            };

            print!("  {} [{}] {}", icon, status_str, check.name);
            if let Some(summary) = &check.summary {
                println!(": {}", summary);
            } else {
                println!();
            }
            if let Some(details) = &check.details {
                for line in details.lines() {
                    println!("        {}", line);
                }
            }
        }

        println!();
        let total = self.checks.len();
        let failed = self.fail_count();
        println!("Summary: {}/{} passed", total - failed, total);
        if failed > 0 {
            println!("         {} FAILED", failed);
        }
    }
}
