//! Configuration management for stemcheck.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over .env; command-line flags take
//! precedence over both.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::assets::DEFAULT_OS;
use crate::platform::Platform;

/// stemcheck configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform the stemcell was built for (STEMCELL_PLATFORM)
    pub platform: Option<Platform>,
    /// Root of the image under test (STEMCELL_ROOT, default: /)
    pub root: PathBuf,
    /// Directory holding reference package lists (STEMCELL_ASSETS_DIR, default: assets)
    pub assets_dir: PathBuf,
    /// OS image name used in package list names (STEMCELL_OS, default: ubuntu-jammy)
    pub os: String,
}

impl Config {
    /// Load configuration from `<base_dir>/.env` and the environment.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let mut vars = HashMap::new();

        let env_path = base_dir.join(".env");
        if env_path.exists() {
            let iter = dotenvy::from_path_iter(&env_path)
                .with_context(|| format!("Cannot read {}", env_path.display()))?;
            for item in iter {
                let (key, value) =
                    item.with_context(|| format!("Malformed line in {}", env_path.display()))?;
                vars.insert(key, value);
            }
        }

        // Environment variables override .env file
        vars.extend(std::env::vars());

        Self::from_vars(&vars, base_dir)
    }

    /// Build configuration from a variable map, filling in defaults.
    pub fn from_vars(vars: &HashMap<String, String>, base_dir: &Path) -> Result<Self> {
        let platform = vars
            .get("STEMCELL_PLATFORM")
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<Platform>())
            .transpose()
            .context("Invalid STEMCELL_PLATFORM")?;

        let root = vars
            .get("STEMCELL_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/"));

        let assets_dir = vars
            .get("STEMCELL_ASSETS_DIR")
            .map(|s| {
                let path = PathBuf::from(s);
                if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                }
            })
            .unwrap_or_else(|| base_dir.join("assets"));

        let os = vars
            .get("STEMCELL_OS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_OS.to_string());

        Ok(Self {
            platform,
            root,
            assets_dir,
            os,
        })
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        match self.platform {
            Some(platform) => println!("  STEMCELL_PLATFORM: {}", platform),
            None => println!("  STEMCELL_PLATFORM: (not set)"),
        }
        println!("  STEMCELL_ROOT: {}", self.root.display());
        println!("  STEMCELL_ASSETS_DIR: {}", self.assets_dir.display());
        println!("  STEMCELL_OS: {}", self.os);
        if self.assets_dir.is_dir() {
            println!("  Package lists: FOUND");
        } else {
            println!("  Package lists: NOT FOUND");
        }
    }
}
