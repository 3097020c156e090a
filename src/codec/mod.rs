//! File-format codecs for section contents.
//!
//! Every codec decodes bytes into a `serde_json::Value` and encodes a value
//! back into bytes. Decoding fails loudly: a missing file is
//! [`CodecError::NotFound`], unparsable content is [`CodecError::Malformed`]
//! carrying the parser's own message.

pub mod json;
pub mod jsonl;
pub mod markdown;
pub mod raw;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Json,
    Jsonl,
    Markdown,
    Raw,
}

impl FileFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Jsonl => "jsonl",
            FileFormat::Markdown => "markdown",
            FileFormat::Raw => "raw",
        }
    }

    pub fn parse_bytes(self, bytes: &[u8]) -> Result<Value, String> {
        match self {
            FileFormat::Json => json::parse(bytes),
            FileFormat::Jsonl => jsonl::parse(bytes),
            FileFormat::Markdown => markdown::parse(bytes),
            FileFormat::Raw => raw::parse(bytes),
        }
    }

    pub fn serialize_value(self, value: &Value) -> Result<Vec<u8>, String> {
        match self {
            FileFormat::Json => json::serialize(value),
            FileFormat::Jsonl => jsonl::serialize(value),
            FileFormat::Markdown => markdown::serialize(value),
            FileFormat::Raw => raw::serialize(value),
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("file not found: {path}")]
    NotFound { path: String },
    #[error("malformed {format} in {path}: {message}")]
    Malformed {
        path: String,
        format: FileFormat,
        message: String,
    },
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {format} for {path}: {message}")]
    Encode {
        path: String,
        format: FileFormat,
        message: String,
    },
}

impl CodecError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CodecError::NotFound { .. })
    }
}

/// Reads `relative` under `dir` and decodes it as `format`. Error messages name
/// `relative` only, never the absolute host path.
pub fn decode(dir: &Path, relative: &str, format: FileFormat) -> Result<Value, CodecError> {
    let path = dir.join(relative);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if is_absent(&source) => {
            return Err(CodecError::NotFound {
                path: relative.to_string(),
            })
        }
        Err(source) => {
            return Err(CodecError::Io {
                path: relative.to_string(),
                source,
            })
        }
    };
    format
        .parse_bytes(&bytes)
        .map_err(|message| CodecError::Malformed {
            path: relative.to_string(),
            format,
            message,
        })
}

/// A regular file standing where a parent directory should be leaves the
/// target just as absent as a missing one.
fn is_absent(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

/// Encodes `value` as `format` and writes it to `relative` under `dir`,
/// creating parent directories as needed.
pub fn encode_to(
    dir: &Path,
    relative: &str,
    format: FileFormat,
    value: &Value,
) -> Result<(), CodecError> {
    let body = format
        .serialize_value(value)
        .map_err(|message| CodecError::Encode {
            path: relative.to_string(),
            format,
            message,
        })?;
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CodecError::Io {
            path: relative.to_string(),
            source,
        })?;
    }
    fs::write(&path, body).map_err(|source| CodecError::Io {
        path: relative.to_string(),
        source,
    })
}
