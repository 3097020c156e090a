use serde_json::Value;

pub fn parse(bytes: &[u8]) -> Result<Value, String> {
    serde_json::from_slice(bytes).map_err(|err| err.to_string())
}

pub fn serialize(value: &Value) -> Result<Vec<u8>, String> {
    let mut body = serde_json::to_vec_pretty(value).map_err(|err| err.to_string())?;
    body.push(b'\n');
    Ok(body)
}
