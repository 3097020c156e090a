pub mod codec;
pub mod config;
pub mod shared;
pub mod validation;
pub mod workspace;

pub use codec::{CodecError, FileFormat};
pub use config::{ConfigError, WorkspaceSettings};
pub use validation::{
    validate_output, OutputFileSpec, OutputSpec, Schema, SchemaRejected, TypedSchema,
    ValidationError, ValidationErrorKind, ValidationResult,
};
pub use workspace::{Workspace, WorkspaceError, WorkspaceManager, WorkspaceMetadata};
