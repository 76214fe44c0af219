use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn first_page() -> i64 {
    1
}

// pages come from the query string as text; anything that isn't an integer means the first page
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_else(first_page))
}

/// Parses a request body as JSON. Empty bodies, malformed JSON and falsy
/// values (`null`, `false`, `0`, `""`, `[]`, `{}`) all count as no payload.
pub fn truthy_json(body: &[u8]) -> Option<Value> {
    let value: Value = serde_json::from_slice(body).ok()?;
    is_truthy(&value).then_some(value)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct PageQuery {
        #[serde(default = "first_page", deserialize_with = "deserialize_page")]
        page: i64,
    }

    fn page(query: &str) -> i64 {
        serde_json::from_str::<PageQuery>(query).unwrap().page
    }

    #[test]
    fn page_defaults_and_falls_back() {
        assert_eq!(page(r#"{}"#), 1);
        assert_eq!(page(r#"{"page": "3"}"#), 3);
        assert_eq!(page(r#"{"page": "three"}"#), 1);
        assert_eq!(page(r#"{"page": null}"#), 1);
    }

    #[test]
    fn falsy_bodies_are_absent() {
        for body in ["", "null", "false", "0", "\"\"", "[]", "{}", "{not json"] {
            assert!(truthy_json(body.as_bytes()).is_none(), "{body}");
        }
    }

    #[test]
    fn truthy_bodies_are_kept() {
        let value = truthy_json(br#"{"question": "q"}"#).unwrap();
        assert_eq!(value["question"], "q");
        assert!(truthy_json(b"[1]").is_some());
    }
}
