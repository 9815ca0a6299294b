//! Shared test utilities for stemcheck tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use stemcheck::assets::{self, MemoryAssetStore};
use stemcheck::platform::Platform;
use stemcheck::target::{CommandExecutor, CommandOutput, FileAccess};
use tempfile::TempDir;

pub const OS: &str = "ubuntu-jammy";

pub const GOOD_SSHD_CONFIG: &str = "Port 22\n\
    Protocol 2\n\
    HostKey /etc/ssh/ssh_host_rsa_key\n\
    HostKey /etc/ssh/ssh_host_ecdsa_key\n\
    MACs hmac-sha2-512-etm@openssh.com,hmac-sha2-256-etm@openssh.com,hmac-sha2-512,hmac-sha2-256\n\
    PermitRootLogin no\n";

pub const GOOD_GRUB_CONFIG: &str = "default=0\n\
    menuentry 'Ubuntu FIPS' {\n\
    \tlinux\t/boot/vmlinuz-5.15.0-1030-fips root=UUID=1f0c5a3e-aaaa-bbbb-cccc-0123456789ab ro console=ttyS0,115200n8\n\
    \tinitrd\t/boot/initrd.img-5.15.0-1030-fips\n\
    }\n";

/// Base list entries. Kernel entries are stored normalized.
pub const BASE_PACKAGES: &[&str] = &[
    "adduser",
    "bash",
    "openssh-server",
    "linux-modules-5.15-fips",
];
pub const FIPS_PACKAGES: &[&str] = &["linux-image-fips", "libssl3", "openssl-fips-module-3"];
pub const GOOGLE_PACKAGES: &[&str] = &["google-compute-engine", "google-guest-agent"];
pub const VSPHERE_PACKAGES: &[&str] = &["open-vm-tools"];
pub const AZURE_PACKAGES: &[&str] = &["walinuxagent", "hyperv-daemons"];
pub const CLOUDSTACK_PACKAGES: &[&str] = &["cloud-guest-utils"];
pub const SOFTLAYER_PACKAGES: &[&str] = &["xe-guest-utilities"];

/// Addendum packages a correctly built image for `platform` installs.
pub fn addendum_packages(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Google => GOOGLE_PACKAGES,
        Platform::Vsphere | Platform::Vcloud => VSPHERE_PACKAGES,
        Platform::Azure => AZURE_PACKAGES,
        Platform::Cloudstack => CLOUDSTACK_PACKAGES,
        Platform::Softlayer => SOFTLAYER_PACKAGES,
        Platform::Alicloud | Platform::Aws | Platform::Openstack | Platform::Warden => &[],
    }
}

/// Installed dpkg selections of a correctly built image, before normalization.
pub const BASE_SELECTIONS: &[&str] = &[
    "adduser",
    "bash",
    "openssh-server",
    "linux-modules-5.15.0-1030-fips",
    "linux-image-fips",
    "libssl3",
    "openssl-fips-module-3",
];

/// Render names as `dpkg --get-selections` output.
pub fn selections_output(names: &[&str]) -> String {
    names
        .iter()
        .map(|n| format!("{}\t\t\t\t\t\tinstall\n", n))
        .collect()
}

/// Base and FIPS lists only, no platform addenda.
pub fn base_store() -> MemoryAssetStore {
    MemoryAssetStore::new()
        .with_packages(&assets::base_list(OS), BASE_PACKAGES)
        .with_packages(&assets::fips_list(OS), FIPS_PACKAGES)
}

/// In-memory package lists for every scenario.
pub fn fixture_store() -> MemoryAssetStore {
    let addenda = [
        Platform::Google,
        Platform::Vsphere,
        Platform::Azure,
        Platform::Cloudstack,
        Platform::Softlayer,
    ];
    addenda.into_iter().fold(base_store(), |store, platform| {
        store.with_packages(&assets::additions_list(OS, platform), addendum_packages(platform))
    })
}

/// Scripted target: canned files and command outputs.
///
/// Commands without a canned output behave like dpkg-query on an unknown
/// package: exit 1 with a "no packages found" message.
#[derive(Default)]
pub struct FakeTarget {
    pub files: HashMap<String, String>,
    pub commands: HashMap<String, CommandOutput>,
}

impl FakeTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// A target that passes every check for the base scenario.
    pub fn good_image() -> Self {
        Self::new()
            .with_file("/etc/ssh/sshd_config", GOOD_SSHD_CONFIG)
            .with_file("/boot/grub/grub.cfg", GOOD_GRUB_CONFIG)
            .with_package_status("linux-image-fips", "install ok installed")
            .with_selections(BASE_SELECTIONS)
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn without_file(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    pub fn with_command(mut self, line: &str, stdout: &str, exit_code: i32) -> Self {
        self.commands.insert(
            line.to_string(),
            CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code,
            },
        );
        self
    }

    pub fn with_package_status(self, package: &str, status: &str) -> Self {
        let line = format!("dpkg-query -W -f=${{Status}} {}", package);
        self.with_command(&line, status, 0)
    }

    pub fn with_selections(self, names: &[&str]) -> Self {
        self.with_command("dpkg --get-selections", &selections_output(names), 0)
    }
}

impl CommandExecutor for FakeTarget {
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        Ok(self.commands.get(&line).cloned().unwrap_or_else(|| CommandOutput {
            stdout: String::new(),
            stderr: format!(
                "dpkg-query: no packages found matching {}",
                args.last().unwrap_or(&"")
            ),
            exit_code: 1,
        }))
    }
}

impl FileAccess for FakeTarget {
    fn read_to_string(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("Cannot read {}: No such file or directory", path))
    }

    fn is_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

/// A temporary image root with files written under it.
pub struct TestImage {
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestImage {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Write `content` at an absolute image path.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let host_path = self.root.join(path.trim_start_matches('/'));
        if let Some(parent) = host_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&host_path, content).expect("Failed to write file");
        host_path
    }
}

/// Write package list files into `dir`.
pub fn write_lists(dir: &Path, lists: &[(&str, &[&str])]) {
    fs::create_dir_all(dir).expect("Failed to create assets dir");
    for (name, packages) in lists {
        let mut content = String::new();
        for pkg in *packages {
            content.push_str(pkg);
            content.push('\n');
        }
        fs::write(dir.join(name), content).expect("Failed to write package list");
    }
}
