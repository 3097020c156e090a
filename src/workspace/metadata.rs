use super::WorkspaceError;
use crate::config::METADATA_FILE_NAME;
use crate::shared::fs_atomic::atomic_write_file;
use crate::shared::ids::{SectionName, TaskType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk record written last during creation. It is the only source used to
/// reconstruct a workspace handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMetadata {
    pub id: String,
    pub task_type: TaskType,
    pub created_at: DateTime<Utc>,
    pub dirs: Vec<SectionName>,
}

pub fn metadata_path(workspace_root: &Path) -> PathBuf {
    workspace_root.join(METADATA_FILE_NAME)
}

pub fn read_metadata(workspace_root: &Path) -> Result<WorkspaceMetadata, WorkspaceError> {
    let path = metadata_path(workspace_root);
    let raw = fs::read_to_string(&path).map_err(|source| WorkspaceError::ReadMetadata {
        path: path.display().to_string(),
        source,
    })?;
    let metadata: WorkspaceMetadata =
        serde_json::from_str(&raw).map_err(|source| WorkspaceError::ParseMetadata {
            path: path.display().to_string(),
            source,
        })?;
    if metadata.id.trim().is_empty() {
        return Err(WorkspaceError::InvalidMetadata {
            path: path.display().to_string(),
            reason: "`id` must be non-empty".to_string(),
        });
    }
    Ok(metadata)
}

pub fn write_metadata(
    workspace_root: &Path,
    metadata: &WorkspaceMetadata,
) -> Result<(), WorkspaceError> {
    let path = metadata_path(workspace_root);
    let body =
        serde_json::to_vec_pretty(metadata).map_err(|source| WorkspaceError::EncodeMetadata {
            path: path.display().to_string(),
            source,
        })?;
    atomic_write_file(&path, &body).map_err(|source| WorkspaceError::WriteMetadata {
        path: path.display().to_string(),
        source,
    })
}
