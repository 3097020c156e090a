use crate::codec::CodecError;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Unknown section `{name}`; valid sections: {}", .valid.join(", "))]
    UnknownSection { name: String, valid: Vec<String> },
    #[error("invalid task type `{task_type}`: {reason}")]
    InvalidTaskType { task_type: String, reason: String },
    #[error("invalid section name `{name}`: {reason}")]
    InvalidSectionName { name: String, reason: String },
    #[error("invalid path `{path}` within section `{section}`: {reason}")]
    InvalidRelativePath {
        section: String,
        path: String,
        reason: String,
    },
    #[error("path `{path}` is not a workspace directory under {root}")]
    OutsideRoot { path: String, root: String },
    #[error("workspace `{id}` not found")]
    NotFound { id: String },
    #[error("failed to allocate a unique workspace id after {attempts} attempts")]
    IdExhausted { attempts: u32 },
    #[error("failed to generate workspace id: {0}")]
    IdGeneration(String),
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to list directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read workspace metadata {path}: {source}")]
    ReadMetadata {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse workspace metadata {path}: {source}")]
    ParseMetadata {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode workspace metadata {path}: {source}")]
    EncodeMetadata {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("workspace metadata {path} is invalid: {reason}")]
    InvalidMetadata { path: String, reason: String },
    #[error("failed to write workspace metadata {path}: {source}")]
    WriteMetadata {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl WorkspaceError {
    pub fn is_not_found(&self) -> bool {
        match self {
            WorkspaceError::NotFound { .. } => true,
            WorkspaceError::Codec(err) => err.is_not_found(),
            _ => false,
        }
    }
}
