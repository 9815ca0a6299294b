//! Preflight checks for a stemcheck run.
//!
//! Verifies the host tools, the image root and the package lists before the
//! suite runs. Run with `stemcheck preflight`.

use std::path::Path;

use anyhow::{bail, Result};

use crate::assets::DirAssetStore;
use crate::checks::{CheckResult, CheckStatus};
use crate::config::Config;
use crate::process::{self, Cmd};
use crate::scenario::ScenarioMatrix;

/// Results of all preflight checks.
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(CheckResult::passed)
    }

    pub fn fail_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Fail)
            .count()
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let (icon, status_str) = match check.status {
                CheckStatus::Pass => ("✓", "PASS"),
                CheckStatus::Fail => ("✗", "FAIL"),
            };
            print!("  {} [{}] {}", icon, status_str, check.name);
            match &check.summary {
                Some(summary) => println!(": {}", summary),
                None => println!(),
            }
        }

        println!();
        let total = self.checks.len();
        println!("Summary: {}/{} passed", total - self.fail_count(), total);
    }
}

/// Run all preflight checks.
pub fn run_preflight(config: &Config) -> PreflightReport {
    let mut checks = Vec::new();

    for tool in ["dpkg", "dpkg-query"] {
        checks.push(check_tool(tool));
    }

    checks.push(check_dir("image root", &config.root));
    checks.push(check_dir("dpkg database", &config.root.join("var/lib/dpkg")));
    checks.push(check_dir("package lists", &config.assets_dir));

    match config.platform {
        Some(platform) => {
            let store = DirAssetStore::new(&config.assets_dir);
            let matrix = ScenarioMatrix::standard();
            match matrix.active(platform) {
                Ok(scenario) => {
                    for name in scenario.asset_names(&config.os) {
                        let path = store.path_of(&name);
                        checks.push(if path.is_file() {
                            CheckResult::pass(&name)
                        } else {
                            CheckResult::fail_with(&name, &format!("Missing: {}", path.display()))
                        });
                    }
                }
                Err(e) => checks.push(CheckResult::fail("platform scenario", &e)),
            }
        }
        None => checks.push(CheckResult::fail_with(
            "platform",
            "Not set. Pass --platform or set STEMCELL_PLATFORM.",
        )),
    }

    PreflightReport { checks }
}

/// Run preflight and bail if any checks fail.
pub fn run_preflight_or_fail(config: &Config) -> Result<()> {
    let report = run_preflight(config);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before running the suite.",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!\n");
    Ok(())
}

/// The tool must be on PATH and answer `--version`.
fn check_tool(tool: &str) -> CheckResult {
    let Some(path) = process::which(tool) else {
        return CheckResult::fail_with(tool, "Not found on PATH. Install the 'dpkg' package.");
    };

    match Cmd::new(&path).arg("--version").run() {
        Ok(result) => {
            let version = result.stdout.lines().next().unwrap_or("unknown version");
            CheckResult::pass_with(tool, &format!("{} ({})", path, version.trim()))
        }
        Err(e) => CheckResult::fail_with(tool, &format!("{} does not run: {:#}", path, e)),
    }
}

fn check_dir(name: &str, path: &Path) -> CheckResult {
    if path.is_dir() {
        CheckResult::pass_with(name, &path.display().to_string())
    } else {
        CheckResult::fail_with(name, &format!("Not a directory: {}", path.display()))
    }
}
