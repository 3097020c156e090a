use serde_json::Value;

pub fn parse(bytes: &[u8]) -> Result<Value, String> {
    String::from_utf8(bytes.to_vec())
        .map(Value::String)
        .map_err(|err| err.to_string())
}

/// Strings are written verbatim; any other value is written as compact JSON.
pub fn serialize(value: &Value) -> Result<Vec<u8>, String> {
    match value {
        Value::String(text) => Ok(text.as_bytes().to_vec()),
        other => serde_json::to_vec(other).map_err(|err| err.to_string()),
    }
}
