//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `run` - Run the stemcell suite
//! - `show` - Display configuration, scenarios and package lists
//! - `preflight` - Run preflight checks

mod preflight;
pub mod run;
pub mod show;

pub use preflight::cmd_preflight;
pub use run::cmd_run;
pub use show::cmd_show;
