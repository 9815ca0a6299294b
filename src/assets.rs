//! Reference package lists shipped alongside the suite.
//!
//! Each list is a plain text file with one package name per line. Lists are
//! named after the OS image they describe:
//!
//! - `dpkg-list-<os>.txt`                      base packages
//! - `dpkg-list-<os>-fips.txt`                 FIPS kernel and crypto packages
//! - `dpkg-list-<os>-<platform>-additions.txt` platform addendum

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CheckError;
use crate::packages::PackageSet;
use crate::platform::Platform;

/// OS image name used when none is configured.
pub const DEFAULT_OS: &str = "ubuntu-jammy";

/// Source of named reference package lists.
pub trait PackageSetLoader {
    /// Load the named list.
    ///
    /// Fails with [`CheckError::AssetNotFound`] if the list does not exist.
    fn load(&self, name: &str) -> Result<PackageSet, CheckError>;
}

/// Asset name of the base list.
pub fn base_list(os: &str) -> String {
    format!("dpkg-list-{}.txt", os)
}

/// Asset name of the FIPS list.
pub fn fips_list(os: &str) -> String {
    format!("dpkg-list-{}-fips.txt", os)
}

/// Asset name of a platform addendum.
pub fn additions_list(os: &str, platform: Platform) -> String {
    format!("dpkg-list-{}-{}-additions.txt", os, platform)
}

/// Split list content into entries.
///
/// Only the line terminator is stripped. Entries are not validated, so a
/// malformed line becomes part of the set exactly as written.
pub fn parse_list(content: &str) -> PackageSet {
    content
        .split_inclusive('\n')
        .map(|line| {
            let line = line.strip_suffix('\n').unwrap_or(line);
            line.strip_suffix('\r').unwrap_or(line)
        })
        .collect()
}

/// Package lists stored as files in a directory.
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    dir: PathBuf,
}

impl DirAssetStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl PackageSetLoader for DirAssetStore {
    fn load(&self, name: &str) -> Result<PackageSet, CheckError> {
        let path = self.path_of(name);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let set = parse_list(&content);
                debug!(asset = name, entries = set.len(), "loaded package list");
                Ok(set)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CheckError::AssetNotFound {
                name: name.to_string(),
                path,
            }),
            Err(e) => Err(CheckError::fetch(
                format!("package list {}", path.display()),
                e.into(),
            )),
        }
    }
}

/// In-memory package lists, for fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    lists: HashMap<String, String>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a list from its raw file content.
    pub fn with_list(mut self, name: &str, content: &str) -> Self {
        self.lists.insert(name.to_string(), content.to_string());
        self
    }

    /// Add a list from package names.
    pub fn with_packages<I, S>(self, name: &str, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut content = String::new();
        for pkg in packages {
            content.push_str(pkg.as_ref());
            content.push('\n');
        }
        self.with_list(name, &content)
    }
}

impl PackageSetLoader for MemoryAssetStore {
    fn load(&self, name: &str) -> Result<PackageSet, CheckError> {
        self.lists
            .get(name)
            .map(|content| parse_list(content))
            .ok_or_else(|| CheckError::AssetNotFound {
                name: name.to_string(),
                path: PathBuf::from(name),
            })
    }
}
