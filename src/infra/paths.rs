// src/infra/paths.rs — Config path resolution
//
// FORESIGHT_HOME overrides everything. Otherwise config lives in ~/.foresight/.

use std::path::PathBuf;

/// Returns the FORESIGHT_HOME override, if set.
fn foresight_home() -> Option<PathBuf> {
    std::env::var_os("FORESIGHT_HOME").map(PathBuf::from)
}

/// Home directory, if the platform can tell us.
pub fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf())
}

/// Configuration directory: $FORESIGHT_HOME/ or ~/.foresight/
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = foresight_home() {
        return Some(home);
    }
    dirs_home().map(|h| h.join(".foresight"))
}

/// Config file path
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}
