//! Configuration file locations

use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the path to the user configuration file
///
/// Platform-specific, e.g. `~/.config/webharness/config.toml` on Linux.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "webharness").map(|dirs| dirs.config_dir().join("config.toml"))
}
