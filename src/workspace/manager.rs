use super::metadata::{read_metadata, write_metadata, WorkspaceMetadata};
use super::sections::build_section_set;
use super::{Workspace, WorkspaceError};
use crate::config::WorkspaceSettings;
use crate::shared::fs_atomic::remove_dir_if_present;
use crate::shared::ids::{generate_workspace_id, TaskType};
use crate::shared::time::{age_from_std, is_older_than, now_utc, to_iso8601};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

const ID_MAX_GENERATION_ATTEMPTS: u32 = 16;

/// Creates, enumerates and prunes workspaces under one managed root.
///
/// The root is plain configuration; several managers over different roots can
/// coexist in one process. No locking is done: concurrent writers into the same
/// root from other processes are tolerated, never coordinated.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
    extra_sections: Vec<String>,
    stale_after: Option<Duration>,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extra_sections: Vec::new(),
            stale_after: None,
        }
    }

    pub fn from_settings(settings: &WorkspaceSettings) -> Self {
        Self {
            root: settings.root.clone(),
            extra_sections: settings.extra_sections.clone(),
            stale_after: settings.stale_after(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn create(&self, task_type: &str) -> Result<Workspace, WorkspaceError> {
        self.create_at::<&str>(task_type, &[], now_utc())
    }

    pub fn create_with_sections<S: AsRef<str>>(
        &self,
        task_type: &str,
        additional_dirs: &[S],
    ) -> Result<Workspace, WorkspaceError> {
        self.create_at(task_type, additional_dirs, now_utc())
    }

    /// Creates the workspace root, every section directory, and finally the
    /// metadata record. A failure part way leaves whatever was created on disk;
    /// without metadata it stays invisible to `list` and `prune_stale`.
    pub fn create_at<S: AsRef<str>>(
        &self,
        task_type: &str,
        additional_dirs: &[S],
        now: DateTime<Utc>,
    ) -> Result<Workspace, WorkspaceError> {
        let task_type =
            TaskType::parse(task_type).map_err(|reason| WorkspaceError::InvalidTaskType {
                task_type: task_type.to_string(),
                reason,
            })?;
        let sections = build_section_set(
            self.extra_sections
                .iter()
                .map(String::as_str)
                .chain(additional_dirs.iter().map(|name| name.as_ref())),
        )?;

        fs::create_dir_all(&self.root).map_err(|source| create_dir_error(&self.root, source))?;
        let (id, path) = self.allocate_workspace_dir(&task_type, now)?;

        for section in &sections {
            let dir = path.join(section.as_str());
            fs::create_dir_all(&dir).map_err(|source| create_dir_error(&dir, source))?;
        }

        let metadata = WorkspaceMetadata {
            id,
            task_type,
            created_at: now,
            dirs: sections,
        };
        write_metadata(&path, &metadata)?;

        tracing::debug!(
            workspace_id = %metadata.id,
            path = %path.display(),
            sections = metadata.dirs.len(),
            created_at = %to_iso8601(now),
            "workspace created"
        );
        Ok(Workspace::from_metadata(path, metadata))
    }

    fn allocate_workspace_dir(
        &self,
        task_type: &TaskType,
        now: DateTime<Utc>,
    ) -> Result<(String, PathBuf), WorkspaceError> {
        for _ in 0..ID_MAX_GENERATION_ATTEMPTS {
            let id =
                generate_workspace_id(task_type, now).map_err(WorkspaceError::IdGeneration)?;
            let path = self.root.join(&id);
            match fs::create_dir(&path) {
                Ok(()) => return Ok((id, path)),
                Err(source) if source.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(create_dir_error(&path, source)),
            }
        }
        Err(WorkspaceError::IdExhausted {
            attempts: ID_MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Every workspace under the root with readable metadata, oldest first.
    /// Directories without usable metadata are skipped, and a missing root is
    /// an empty listing.
    pub fn list(&self) -> Result<Vec<Workspace>, WorkspaceError> {
        let mut workspaces = Vec::new();
        for dir in self.child_dirs()? {
            match read_metadata(&dir) {
                Ok(metadata) => workspaces.push(Workspace::from_metadata(dir, metadata)),
                Err(err) => {
                    tracing::debug!(
                        path = %dir.display(),
                        reason = %err,
                        "skipping directory without usable metadata"
                    );
                }
            }
        }
        workspaces.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(workspaces)
    }

    /// Rebuilds the handle for `id` from its metadata record.
    pub fn open(&self, id: &str) -> Result<Workspace, WorkspaceError> {
        let not_found = || WorkspaceError::NotFound { id: id.to_string() };
        if !is_single_component(id) {
            return Err(not_found());
        }
        let path = self.root.join(id);
        let metadata = match read_metadata(&path) {
            Ok(metadata) => metadata,
            Err(WorkspaceError::ReadMetadata { source, .. })
                if source.kind() == ErrorKind::NotFound =>
            {
                return Err(not_found())
            }
            Err(err) => return Err(err),
        };
        if metadata.id != id {
            return Err(not_found());
        }
        Ok(Workspace::from_metadata(path, metadata))
    }

    /// Recursively removes the workspace. Already-absent workspaces are fine.
    pub fn cleanup(&self, workspace: &Workspace) -> Result<(), WorkspaceError> {
        remove_workspace_dir(workspace.path()).map(|_| ())
    }

    /// Removes a directory directly under the root, e.g. one reported by
    /// [`WorkspaceManager::find_orphans`]. Returns whether anything was removed.
    pub fn cleanup_path(&self, path: &Path) -> Result<bool, WorkspaceError> {
        if path.parent() != Some(self.root.as_path()) || path.file_name().is_none() {
            return Err(WorkspaceError::OutsideRoot {
                path: path.display().to_string(),
                root: self.root.display().to_string(),
            });
        }
        remove_workspace_dir(path)
    }

    pub fn prune_stale(&self, max_age: Duration) -> Result<usize, WorkspaceError> {
        self.prune_stale_at(max_age, now_utc())
    }

    /// Removes every listed workspace created at least `max_age` before `now`
    /// and returns how many were actually removed by this call.
    pub fn prune_stale_at(
        &self,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> Result<usize, WorkspaceError> {
        let max_age = age_from_std(max_age);
        let mut removed = 0;
        for workspace in self.list()? {
            if !is_older_than(workspace.created_at(), now, max_age) {
                continue;
            }
            if remove_workspace_dir(workspace.path())? {
                removed += 1;
            }
        }
        tracing::debug!(root = %self.root.display(), removed, "pruned stale workspaces");
        Ok(removed)
    }

    /// Prunes with the configured `stale_after_seconds`; a no-op when unset.
    pub fn prune_configured(&self) -> Result<usize, WorkspaceError> {
        match self.stale_after {
            Some(max_age) => self.prune_stale(max_age),
            None => Ok(0),
        }
    }

    /// Directories under the root whose metadata is missing or unreadable.
    /// These never show up in `list` and are never pruned by age.
    pub fn find_orphans(&self) -> Result<Vec<PathBuf>, WorkspaceError> {
        let mut orphans = Vec::new();
        for dir in self.child_dirs()? {
            if let Err(err) = read_metadata(&dir) {
                tracing::warn!(
                    path = %dir.display(),
                    reason = %err,
                    "orphaned workspace directory"
                );
                orphans.push(dir);
            }
        }
        orphans.sort();
        Ok(orphans)
    }

    fn child_dirs(&self) -> Result<Vec<PathBuf>, WorkspaceError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(WorkspaceError::ReadDir {
                    path: self.root.display().to_string(),
                    source,
                })
            }
        };

        let mut dirs = Vec::new();
        for entry in entries {
            // Entries can vanish between readdir and stat when another process
            // cleans up concurrently.
            let Ok(entry) = entry else {
                continue;
            };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                dirs.push(entry.path());
            }
        }
        Ok(dirs)
    }
}

fn is_single_component(id: &str) -> bool {
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn remove_workspace_dir(path: &Path) -> Result<bool, WorkspaceError> {
    let removed = remove_dir_if_present(path).map_err(|source| WorkspaceError::Remove {
        path: path.display().to_string(),
        source,
    })?;
    if removed {
        tracing::debug!(path = %path.display(), "workspace removed");
    }
    Ok(removed)
}

fn create_dir_error(path: &Path, source: std::io::Error) -> WorkspaceError {
    WorkspaceError::CreateDir {
        path: path.display().to_string(),
        source,
    }
}
