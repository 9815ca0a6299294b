//! Access to the image under test.
//!
//! Checks never touch the host directly. They go through [`CommandExecutor`]
//! and [`FileAccess`], so the same checks run against a live machine, a
//! mounted image root, or in-memory fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::process::Cmd;

/// Captured output of a command run against the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs commands on the target.
///
/// A non-zero exit is not an error; the output is returned for the caller
/// to interpret. Errors mean the command could not be run at all.
pub trait CommandExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Reads files on the target by their absolute path inside the image.
pub trait FileAccess {
    fn read_to_string(&self, path: &str) -> Result<String>;
    fn is_file(&self, path: &str) -> bool;
}

/// Both services together, as needed by the suite.
pub trait Target: CommandExecutor + FileAccess {}

impl<T: CommandExecutor + FileAccess> Target for T {}

/// Programs that read the dpkg database and accept `--admindir`.
const DPKG_TOOLS: &[&str] = &["dpkg", "dpkg-query"];

/// The local machine, or an image mounted at `root`.
#[derive(Debug, Clone)]
pub struct HostTarget {
    root: PathBuf,
}

impl HostTarget {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn is_live(&self) -> bool {
        self.root == Path::new("/")
    }

    /// Host path of an absolute path inside the image.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// dpkg database of the image.
    pub fn admindir(&self) -> PathBuf {
        self.resolve("/var/lib/dpkg")
    }
}

impl CommandExecutor for HostTarget {
    /// dpkg tools are pointed at the image's database when the root is
    /// not `/`. Other programs run on the host unchanged.
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut cmd = Cmd::new(program).allow_fail();
        if !self.is_live() && DPKG_TOOLS.contains(&program) {
            cmd = cmd.arg(format!("--admindir={}", self.admindir().display()));
        }
        let result = cmd.args(args).run()?;
        debug!(program, exit_code = result.code(), "target command finished");

        Ok(CommandOutput {
            exit_code: result.code(),
            stdout: result.stdout,
            stderr: result.stderr,
        })
    }
}

impl FileAccess for HostTarget {
    fn read_to_string(&self, path: &str) -> Result<String> {
        let host_path = self.resolve(path);
        fs::read_to_string(&host_path)
            .with_context(|| format!("Cannot read {}", host_path.display()))
    }

    fn is_file(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_under_root() {
        let target = HostTarget::new("/mnt/image");
        assert_eq!(
            target.resolve("/etc/ssh/sshd_config"),
            PathBuf::from("/mnt/image/etc/ssh/sshd_config")
        );
        assert_eq!(target.admindir(), PathBuf::from("/mnt/image/var/lib/dpkg"));
    }

    #[test]
    fn test_resolve_live_root() {
        let target = HostTarget::new("/");
        assert_eq!(target.resolve("/boot/grub/grub.cfg"), PathBuf::from("/boot/grub/grub.cfg"));
    }

    #[test]
    fn test_execute_returns_failed_exit_code() {
        let out = HostTarget::new("/").execute("false", &[]).unwrap();
        assert!(!out.success());
        assert_eq!(out.exit_code, 1);
    }

    #[test]
    fn test_execute_missing_program_is_error() {
        assert!(HostTarget::new("/").execute("nonexistent_program_12345", &[]).is_err());
    }
}
