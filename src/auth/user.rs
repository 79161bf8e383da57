use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity returned by [`crate::auth::Provider::get_identity`].
///
/// `id` is unique only within the provider that produced it. `raw` keeps the
/// provider's original payload so callers can reach attributes the
/// normalization does not cover.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub locale: Option<String>,
    #[serde(default)]
    pub raw: Value,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Reads a top-level attribute from the raw provider payload.
    pub fn raw_field(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }
}

/// Renders a JSON scalar as an identifier string.
///
/// Providers disagree on whether ids are numbers or strings; both map to the
/// same textual form.
pub(crate) fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(crate) fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_normalize() {
        assert_eq!(id_from_value(&json!(42)), Some("42".to_string()));
        assert_eq!(id_from_value(&json!("42")), Some("42".to_string()));
        assert_eq!(id_from_value(&json!("")), None);
        assert_eq!(id_from_value(&json!(null)), None);
    }

    #[test]
    fn raw_field_reads_original_payload() {
        let mut user = User::new("1");
        user.raw = json!({"screen_name": "durov"});
        assert_eq!(user.raw_field("screen_name"), Some(&json!("durov")));
        assert_eq!(user.raw_field("missing"), None);
    }

    #[test]
    fn string_field_skips_empty_values() {
        let payload = json!({"email": "", "name": "Ann"});
        assert_eq!(string_field(&payload, "email"), None);
        assert_eq!(string_field(&payload, "name"), Some("Ann".to_string()));
    }
}
