use super::{default_workspace_root, ConfigError};
use crate::shared::ids::SectionName;
use crate::workspace::DEFAULT_SECTIONS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSettings {
    pub root: PathBuf,
    /// Sections added to every workspace after the defaults.
    #[serde(default)]
    pub extra_sections: Vec<String>,
    #[serde(default)]
    pub stale_after_seconds: Option<u64>,
}

impl WorkspaceSettings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extra_sections: Vec::new(),
            stale_after_seconds: None,
        }
    }

    pub fn with_default_root() -> Result<Self, ConfigError> {
        Ok(Self::new(default_workspace_root()?))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.root.is_absolute() {
            return Err(ConfigError::Settings(
                "`root` must be an absolute path".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.extra_sections {
            SectionName::parse(name).map_err(|err| {
                ConfigError::Settings(format!("`extra_sections` entry `{name}`: {err}"))
            })?;
            if DEFAULT_SECTIONS.contains(&name.as_str()) {
                return Err(ConfigError::Settings(format!(
                    "`extra_sections` entry `{name}` duplicates a default section"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Settings(format!(
                    "`extra_sections` entry `{name}` is listed more than once"
                )));
            }
        }

        if self.stale_after_seconds == Some(0) {
            return Err(ConfigError::Settings(
                "`stale_after_seconds` must be >= 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn stale_after(&self) -> Option<Duration> {
        self.stale_after_seconds.map(Duration::from_secs)
    }
}
