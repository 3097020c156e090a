use serde_json::{Map, Value};

const FENCE: &str = "---";

/// Decodes markdown with optional YAML frontmatter into
/// `{"frontmatter": <mapping or null>, "body": <text>}`.
pub fn parse(bytes: &[u8]) -> Result<Value, String> {
    let text = std::str::from_utf8(bytes).map_err(|err| err.to_string())?;
    let (frontmatter, body) = split_frontmatter(text)?;
    let frontmatter = match frontmatter {
        None => Value::Null,
        Some(raw) if raw.trim().is_empty() => Value::Object(Map::new()),
        Some(raw) => {
            let parsed: Value = serde_yaml::from_str(raw)
                .map_err(|err| format!("invalid frontmatter: {err}"))?;
            if !parsed.is_object() {
                return Err("invalid frontmatter: expected a mapping".to_string());
            }
            parsed
        }
    };

    let mut doc = Map::new();
    doc.insert("frontmatter".to_string(), frontmatter);
    doc.insert("body".to_string(), Value::String(body.to_string()));
    Ok(Value::Object(doc))
}

/// Accepts a `{frontmatter, body}` document or a bare string body.
pub fn serialize(value: &Value) -> Result<Vec<u8>, String> {
    let (frontmatter, body) = match value {
        Value::String(body) => (None, body.as_str()),
        Value::Object(doc) => {
            let body = match doc.get("body") {
                None | Some(Value::Null) => "",
                Some(Value::String(body)) => body.as_str(),
                Some(_) => return Err("markdown `body` must be a string".to_string()),
            };
            let frontmatter = match doc.get("frontmatter") {
                None | Some(Value::Null) => None,
                Some(fm @ Value::Object(_)) => Some(fm),
                Some(_) => return Err("markdown `frontmatter` must be a mapping".to_string()),
            };
            (frontmatter, body)
        }
        _ => {
            return Err(
                "markdown value must be a string or a {frontmatter, body} object".to_string(),
            )
        }
    };

    let mut out = String::new();
    if let Some(frontmatter) = frontmatter {
        let yaml = serde_yaml::to_string(frontmatter).map_err(|err| err.to_string())?;
        out.push_str(FENCE);
        out.push('\n');
        out.push_str(&yaml);
        if !yaml.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(FENCE);
        out.push('\n');
    }
    out.push_str(body);
    Ok(out.into_bytes())
}

fn split_frontmatter(text: &str) -> Result<(Option<&str>, &str), String> {
    let Some(rest) = strip_fence_line(text) else {
        return Ok((None, text));
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == FENCE {
            let frontmatter = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((Some(frontmatter), body));
        }
        offset += line.len();
    }
    Err("unterminated frontmatter block".to_string())
}

fn strip_fence_line(text: &str) -> Option<&str> {
    text.strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
}
