use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    RequiredFileMissing,
    MalformedContent,
    SchemaRejected,
    CustomPredicateFailed,
    CustomPredicateThrew,
}

/// One problem with one expected file. `path` is always the path as written in
/// the output spec, never a resolved host path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn errors_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |err| err.path == path)
    }

    /// Plain-text report suitable for handing back to the producer.
    pub fn summary(&self) -> String {
        if self.valid {
            return "All expected output files passed validation.".to_string();
        }
        let mut out = format!(
            "Output validation found {} problem{}:",
            self.errors.len(),
            if self.errors.len() == 1 { "" } else { "s" }
        );
        for err in &self.errors {
            let _ = write!(out, "\n- {}: {}", err.path, err.message);
        }
        out
    }
}
