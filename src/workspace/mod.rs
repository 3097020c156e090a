//! Disposable, sectioned directories for exchanging files with an agent.
//!
//! A [`Workspace`] is a handle onto a directory created by a
//! [`WorkspaceManager`]. Its section set is fixed at creation and recorded in
//! the metadata file, which is the only thing a handle is ever rebuilt from.

pub mod error;
pub mod manager;
pub mod metadata;
pub mod sections;

pub use error::WorkspaceError;
pub use manager::WorkspaceManager;
pub use metadata::{read_metadata, WorkspaceMetadata};
pub use sections::{
    resolve, DEFAULT_SECTIONS, INPUT_SECTION, OUTPUT_SECTION, RESOURCES_SECTION, SCRATCH_SECTION,
};

use crate::codec::{self, FileFormat};
use crate::shared::ids::{SectionName, TaskType};
use crate::validation::{validate_output, OutputSpec, ValidationResult};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    id: String,
    task_type: TaskType,
    path: PathBuf,
    sections: Vec<SectionName>,
    created_at: DateTime<Utc>,
}

impl Workspace {
    pub(crate) fn from_metadata(path: PathBuf, metadata: WorkspaceMetadata) -> Self {
        Self {
            id: metadata.id,
            task_type: metadata.task_type,
            path,
            sections: metadata.dirs,
            created_at: metadata.created_at,
        }
    }

    /// Rebuilds a handle for the workspace rooted at `path` from its metadata.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let path = path.into();
        let metadata = read_metadata(&path)?;
        Ok(Self::from_metadata(path, metadata))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn task_type(&self) -> &TaskType {
        &self.task_type
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sections(&self) -> &[SectionName] {
        &self.sections
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|section| section.as_str() == name)
    }

    pub fn metadata(&self) -> WorkspaceMetadata {
        WorkspaceMetadata {
            id: self.id.clone(),
            task_type: self.task_type.clone(),
            created_at: self.created_at,
            dirs: self.sections.clone(),
        }
    }

    pub fn section_path(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        resolve(&self.sections, &self.path, name)
    }

    /// Decodes `relative` inside `section`. Missing files surface as
    /// [`WorkspaceError::Codec`] with [`codec::CodecError::NotFound`].
    pub fn read(
        &self,
        section: &str,
        relative: &str,
        format: FileFormat,
    ) -> Result<Value, WorkspaceError> {
        let dir = self.section_path(section)?;
        sections::join_within(&dir, section, relative)?;
        Ok(codec::decode(&dir, relative, format)?)
    }

    /// Encodes `value` into `relative` inside `section`. The section is checked
    /// before anything is written.
    pub fn write(
        &self,
        section: &str,
        relative: &str,
        format: FileFormat,
        value: &Value,
    ) -> Result<PathBuf, WorkspaceError> {
        let dir = self.section_path(section)?;
        let target = sections::join_within(&dir, section, relative)?;
        codec::encode_to(&dir, relative, format, value)?;
        Ok(target)
    }

    /// Checks the `output` section against `spec`. Never fails; problems are
    /// reported in the result.
    pub fn validate_output(&self, spec: &OutputSpec) -> ValidationResult {
        validate_output(&self.path.join(OUTPUT_SECTION), spec)
    }
}
