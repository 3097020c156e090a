pub mod error;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use paths::{default_workspace_root, DEFAULT_ROOT_DIR_NAME, METADATA_FILE_NAME, ROOT_ENV_VAR};
pub use settings::WorkspaceSettings;
