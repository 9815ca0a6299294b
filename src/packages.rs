//! Installed package parsing and kernel name normalization.
//!
//! Kernel packages carry the full upstream version and ABI number in their
//! names (`linux-headers-5.15.0-1030-fips`). Those change on every rebuild,
//! so the reference lists store them collapsed to `<major>.<minor>`
//! (`linux-headers-5.15-fips`), and the observed list is collapsed the same
//! way before comparison.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Versioned kernel package pattern: `linux-<flavor>-<major>.<minor>.<patch>-<build>`.
const KERNEL_VERSION_PATTERN: &str = r"linux-(.+)-([0-9]+)\.([0-9]+)\.([0-9]+)-([0-9]+)";

fn kernel_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(KERNEL_VERSION_PATTERN).expect("kernel version pattern is valid"))
}

/// Collapse a versioned kernel package name to `linux-<flavor>-<major>.<minor>`.
///
/// Only the first match in the name is rewritten per pass; text after the
/// build number (e.g. `-generic`) is kept. Passes repeat until nothing
/// matches, so the result is stable under another call. Every pass removes
/// at least `.<patch>-<build>`, so this terminates.
pub fn normalize(name: &str) -> String {
    let re = kernel_version_regex();
    let mut current = name.to_string();
    while re.is_match(&current) {
        current = re.replace(&current, "linux-${1}-${2}.${3}").into_owned();
    }
    current
}

/// An unordered, duplicate-free collection of package names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackageSet(BTreeSet<String>);

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Add every name from `other`.
    pub fn extend_from(&mut self, other: &PackageSet) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Names in `self` that are not in `other`.
    pub fn difference(&self, other: &PackageSet) -> PackageSet {
        PackageSet(self.0.difference(&other.0).cloned().collect())
    }

    pub fn is_subset(&self, other: &PackageSet) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl<S: Into<String>> FromIterator<S> for PackageSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PackageSet(iter.into_iter().map(Into::into).collect())
    }
}

/// dpkg selection state of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Install,
    Hold,
    Deinstall,
    Purge,
    /// Anything dpkg may add later; kept verbatim.
    Other(String),
}

impl SelectionState {
    fn parse(s: &str) -> Self {
        match s {
            "install" => SelectionState::Install,
            "hold" => SelectionState::Hold,
            "deinstall" => SelectionState::Deinstall,
            "purge" => SelectionState::Purge,
            other => SelectionState::Other(other.to_string()),
        }
    }
}

/// One line of `dpkg --get-selections` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub state: SelectionState,
}

/// Parse `dpkg --get-selections` output.
///
/// dpkg pads the name and state with tabs. The name is the first field; the
/// state is the last. Lines with only a name get an empty `Other` state.
pub fn parse_selections(output: &str) -> Vec<Selection> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let state = fields.last().unwrap_or("");
            Some(Selection {
                name: name.to_string(),
                state: SelectionState::parse(state),
            })
        })
        .collect()
}

/// Normalized names of every selection, regardless of selection state.
pub fn observed_packages(output: &str) -> PackageSet {
    parse_selections(output)
        .iter()
        .map(|s| normalize(&s.name))
        .collect()
}
