use serde_json::Value;

/// Decodes one JSON value per non-blank line into a JSON array.
pub fn parse(bytes: &[u8]) -> Result<Value, String> {
    let text = std::str::from_utf8(bytes).map_err(|err| err.to_string())?;
    let mut items = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let item = serde_json::from_str(trimmed)
            .map_err(|err| format!("line {}: {err}", idx + 1))?;
        items.push(item);
    }
    Ok(Value::Array(items))
}

/// Accepts an array (one line per item) or a single value (one line).
pub fn serialize(value: &Value) -> Result<Vec<u8>, String> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    };
    let mut body = Vec::new();
    for item in items {
        serde_json::to_writer(&mut body, item).map_err(|err| err.to_string())?;
        body.push(b'\n');
    }
    Ok(body)
}
