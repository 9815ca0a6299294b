//! Run command - executes the suite against the configured image.

use anyhow::{bail, Context, Result};

use crate::assets::DirAssetStore;
use crate::config::Config;
use crate::scenario::ScenarioMatrix;
use crate::suite::Suite;
use crate::target::HostTarget;

/// Execute the run command.
pub fn cmd_run(config: &Config, json: bool) -> Result<()> {
    let Some(platform) = config.platform else {
        bail!("No platform given. Pass --platform or set STEMCELL_PLATFORM.");
    };

    let target = HostTarget::new(&config.root);
    let store = DirAssetStore::new(&config.assets_dir);
    let suite = Suite::new(ScenarioMatrix::standard(), &config.os);

    let report = suite.run(&target, &store, platform);

    if json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        report.print();
    }

    if !report.all_passed() {
        bail!("{} check(s) failed", report.fail_count());
    }
    Ok(())
}
