use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_WIDTH: usize = 4;
const ID_SUFFIX_SPACE: u32 = 36 * 36 * 36 * 36;

pub fn validate_task_type_value(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("task type must be non-empty".to_string());
    }
    if value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Ok(());
    }
    Err("task type must use only ASCII letters, digits, '-' or '_'".to_string())
}

/// Section names become directory names directly under the workspace root, so
/// they must be exactly one normal path component.
pub fn validate_section_name_value(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("section name must be non-empty".to_string());
    }
    if value == "." || value == ".." {
        return Err("section name must not be `.` or `..`".to_string());
    }
    if value.contains(['/', '\\', '\0']) {
        return Err("section name must not contain path separators".to_string());
    }
    if value.starts_with('.') {
        return Err("section name must not start with `.`".to_string());
    }
    Ok(())
}

macro_rules! define_id_type {
    ($name:ident, $kind:literal, $validate:path) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: &str) -> Result<Self, String> {
                $validate(raw)?;
                Ok(Self(raw.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.as_str()
            }
        }

        impl AsRef<std::path::Path> for $name {
            fn as_ref(&self) -> &std::path::Path {
                std::path::Path::new(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(|err| {
                    D::Error::custom(format!("invalid {} `{}`: {}", $kind, raw, err))
                })
            }
        }
    };
}

define_id_type!(TaskType, "task type", validate_task_type_value);
define_id_type!(SectionName, "section name", validate_section_name_value);

/// `<task type>-<base36 unix millis>-<4 random base36 chars>`.
pub fn generate_workspace_id(task_type: &TaskType, now: DateTime<Utc>) -> Result<String, String> {
    let millis = u64::try_from(now.timestamp_millis())
        .map_err(|_| "workspace ids require a timestamp after the unix epoch".to_string())?;
    let mut bytes = [0_u8; 4];
    getrandom::getrandom(&mut bytes)
        .map_err(|err| format!("failed to read random bytes: {err}"))?;
    let sample = u32::from_le_bytes(bytes) % ID_SUFFIX_SPACE;
    Ok(format!(
        "{task_type}-{}-{}",
        base36_encode_u64(millis),
        base36_encode_fixed_u32(sample, ID_SUFFIX_WIDTH)
    ))
}

fn base36_encode_u64(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while value > 0 {
        chars.push(BASE36_ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    chars.iter().rev().collect()
}

fn base36_encode_fixed_u32(mut value: u32, width: usize) -> String {
    let mut chars = vec!['0'; width];
    for slot in chars.iter_mut().rev() {
        *slot = BASE36_ALPHABET[(value % 36) as usize] as char;
        value /= 36;
    }
    chars.into_iter().collect()
}
