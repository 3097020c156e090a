use crate::config::ConfigError;
use std::path::PathBuf;

pub const ROOT_ENV_VAR: &str = "TASKSPACE_ROOT";
pub const DEFAULT_ROOT_DIR_NAME: &str = "taskspace";
pub const METADATA_FILE_NAME: &str = ".workspace.json";

/// `$TASKSPACE_ROOT` when set and non-empty, otherwise `<temp dir>/taskspace`.
pub fn default_workspace_root() -> Result<PathBuf, ConfigError> {
    if let Some(raw) = std::env::var_os(ROOT_ENV_VAR).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(raw));
    }
    let temp = std::env::temp_dir();
    if temp.as_os_str().is_empty() {
        return Err(ConfigError::RootUnavailable);
    }
    Ok(temp.join(DEFAULT_ROOT_DIR_NAME))
}
