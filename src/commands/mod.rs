//! Operations exposed as `fic` subcommands.
//!
//! - [`monitor`]: the periodic scan-and-compare loop (read-only on the baseline)
//! - [`update`]: the one-shot baseline refresh (the only baseline writer)

pub mod monitor;
pub mod update;

pub use monitor::{CycleReport, Monitor, MonitorSettings, MonitorState, MonitorSummary};
pub use update::{run_update, run_update_until, UpdateSummary};
