//! Show command - displays configuration, scenarios and package lists.

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

use crate::assets::{self, DirAssetStore, PackageSetLoader};
use crate::config::Config;
use crate::scenario::ScenarioMatrix;

/// What to show.
pub enum ShowTarget {
    /// Effective configuration
    Config,
    /// Platform to scenario mapping
    Scenarios,
    /// Expected package set for the configured platform
    Expected,
    /// Package lists in the asset directory
    Assets,
}

/// Execute the show command.
pub fn cmd_show(config: &Config, what: ShowTarget) -> Result<()> {
    match what {
        ShowTarget::Config => config.print(),
        ShowTarget::Scenarios => show_scenarios(config),
        ShowTarget::Expected => show_expected(config)?,
        ShowTarget::Assets => show_assets(config)?,
    }
    Ok(())
}

fn show_scenarios(config: &Config) {
    let matrix = ScenarioMatrix::standard();
    println!("Package scenarios ({}):", config.os);
    for scenario in matrix.scenarios() {
        let platforms: Vec<&str> = scenario.platforms.iter().map(|p| p.as_str()).collect();
        println!("  {:<12} {}", scenario.name, platforms.join(", "));
        for name in scenario.asset_names(&config.os) {
            println!("  {:<12}   + {}", "", name);
        }
    }
}

fn show_expected(config: &Config) -> Result<()> {
    let Some(platform) = config.platform else {
        bail!("No platform given. Pass --platform or set STEMCELL_PLATFORM.");
    };

    let matrix = ScenarioMatrix::standard();
    let scenario = matrix.active(platform)?;
    let store = DirAssetStore::new(&config.assets_dir);
    let expected = scenario
        .expected(&store, &config.os)
        .with_context(|| format!("Cannot assemble '{}' package set", scenario.name))?;

    for name in expected.iter() {
        println!("{}", name);
    }
    Ok(())
}

fn show_assets(config: &Config) -> Result<()> {
    let store = DirAssetStore::new(&config.assets_dir);
    println!("Package lists in {}:", store.dir().display());

    let mut names = Vec::new();
    for entry in WalkDir::new(store.dir()).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Cannot list {}", store.dir().display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_file() && name.starts_with("dpkg-list-") && name.ends_with(".txt") {
            names.push(name);
        }
    }

    if names.is_empty() {
        println!("  (none)");
    }
    for name in names {
        let count = store.load(&name)?.len();
        let shared = name == assets::base_list(&config.os) || name == assets::fips_list(&config.os);
        let marker = if shared { "*" } else { " " };
        println!(" {} {:<50} {:>5} packages", marker, name, count);
    }
    Ok(())
}
