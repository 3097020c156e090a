//! Output validation that collects every problem instead of failing fast.
//!
//! Each [`OutputFileSpec`] is checked independently, in declaration order:
//! existence, then decode, then the optional schema and custom predicate. A
//! missing or undecodable file stops that file's checks only; the schema and
//! the predicate always both run when the file decodes. Nothing here returns
//! an error or lets a caller-supplied check's panic escape.

pub mod report;
pub mod schema;

pub use report::{ValidationError, ValidationErrorKind, ValidationResult};
pub use schema::{Schema, SchemaRejected, TypedSchema};

use crate::codec::{self, CodecError, FileFormat};
use crate::workspace::sections::join_within;
use serde_json::Value;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

/// Custom check over decoded content: `Ok(false)` rejects, `Err` reports that
/// the check itself failed.
///
/// Checks are synchronous. An asynchronous check has to block on its future
/// inside the closure, e.g. with the caller's runtime handle.
pub type CustomValidator = Arc<dyn Fn(&Value) -> Result<bool, String> + Send + Sync>;

#[derive(Clone)]
pub struct OutputFileSpec {
    pub path: String,
    pub format: FileFormat,
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Arc<dyn Schema>>,
    pub validate: Option<CustomValidator>,
}

impl OutputFileSpec {
    pub fn required(path: impl Into<String>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format,
            required: true,
            description: None,
            schema: None,
            validate: None,
        }
    }

    pub fn optional(path: impl Into<String>, format: FileFormat) -> Self {
        Self {
            required: false,
            ..Self::required(path, format)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Schema + 'static) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }
}

impl std::fmt::Debug for OutputFileSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputFileSpec")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("required", &self.required)
            .field("description", &self.description)
            .field("schema", &self.schema.is_some())
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutputSpec {
    files: Vec<OutputFileSpec>,
}

impl OutputSpec {
    pub fn new(files: Vec<OutputFileSpec>) -> Self {
        Self { files }
    }

    pub fn with_file(mut self, file: OutputFileSpec) -> Self {
        self.files.push(file);
        self
    }

    pub fn files(&self) -> &[OutputFileSpec] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<OutputFileSpec> for OutputSpec {
    fn from_iter<I: IntoIterator<Item = OutputFileSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Checks every file in `spec` under `output_dir` and reports all problems in
/// declaration order.
///
/// A panicking schema or check is reported as a validation error. The process
/// panic hook still runs first, so with the default hook the panic message is
/// also printed to stderr; callers that need silence install their own hook.
pub fn validate_output(output_dir: &Path, spec: &OutputSpec) -> ValidationResult {
    let mut errors = Vec::new();
    for file in spec.files() {
        check_file(output_dir, file, &mut errors);
    }
    tracing::debug!(
        output_dir = %output_dir.display(),
        files = spec.len(),
        errors = errors.len(),
        "output validation finished"
    );
    ValidationResult::from_errors(errors)
}

fn check_file(output_dir: &Path, file: &OutputFileSpec, errors: &mut Vec<ValidationError>) {
    let mut report = |kind: ValidationErrorKind, message: String| {
        errors.push(ValidationError {
            path: file.path.clone(),
            message,
            kind,
        });
    };

    if let Err(err) = join_within(output_dir, "output", &file.path) {
        report(
            ValidationErrorKind::MalformedContent,
            format!("Failed to read file: {err}"),
        );
        return;
    }

    let content = match codec::decode(output_dir, &file.path, file.format) {
        Ok(content) => content,
        Err(CodecError::NotFound { .. }) => {
            if file.required {
                let message = match &file.description {
                    Some(description) => format!("Required file missing ({description})"),
                    None => "Required file missing".to_string(),
                };
                report(ValidationErrorKind::RequiredFileMissing, message);
            }
            return;
        }
        Err(err) => {
            report(
                ValidationErrorKind::MalformedContent,
                format!("Failed to read file: {}", underlying_message(&err)),
            );
            return;
        }
    };

    if let Some(schema) = &file.schema {
        if let Err(message) = apply_schema(schema.as_ref(), file.format, &content) {
            report(
                ValidationErrorKind::SchemaRejected,
                format!("Schema validation failed: {message}"),
            );
        }
    }

    if let Some(validate) = &file.validate {
        match catch_unwind(AssertUnwindSafe(|| validate(&content))) {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => report(
                ValidationErrorKind::CustomPredicateFailed,
                "Custom validation returned false".to_string(),
            ),
            Ok(Err(message)) => report(
                ValidationErrorKind::CustomPredicateThrew,
                format!("Custom validation threw: {message}"),
            ),
            Err(payload) => report(
                ValidationErrorKind::CustomPredicateThrew,
                format!("Custom validation threw: {}", panic_message(&*payload)),
            ),
        }
    }
}

/// JSONL content is checked item by item; the first rejected item wins.
fn apply_schema(schema: &dyn Schema, format: FileFormat, content: &Value) -> Result<(), String> {
    let items = match (format, content) {
        (FileFormat::Jsonl, Value::Array(items)) => items.as_slice(),
        _ => std::slice::from_ref(content),
    };
    for item in items {
        match catch_unwind(AssertUnwindSafe(|| schema.parse(item))) {
            Ok(Ok(_)) => {}
            Ok(Err(rejected)) => return Err(rejected.0),
            Err(payload) => return Err(panic_message(&*payload)),
        }
    }
    Ok(())
}

fn underlying_message(err: &CodecError) -> String {
    match err {
        CodecError::Malformed { message, .. } => message.clone(),
        CodecError::Io { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "check panicked".to_string()
    }
}
