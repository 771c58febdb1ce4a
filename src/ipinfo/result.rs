//! Response schema for ipinfo.io lookups.
//!
//! The provider payload is kept as a JSON object so nothing it returns is
//! lost. Every field is optional and checked when it is read.

use serde_json::{Map, Value};
use strum::{Display, EnumIter};

use crate::error::LookupError;

/// Displayable fields, in card order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum InfoField {
    #[strum(to_string = "IP")]
    Ip,
    #[strum(to_string = "Hostname")]
    Hostname,
    #[strum(to_string = "City")]
    City,
    #[strum(to_string = "Region")]
    Region,
    #[strum(to_string = "Country")]
    Country,
    #[strum(to_string = "Location (lat,long)")]
    Location,
    #[strum(to_string = "Organization")]
    Organization,
    #[strum(to_string = "Postal")]
    Postal,
    #[strum(to_string = "Timezone")]
    Timezone,
}

impl InfoField {
    /// Key of this field in the provider payload.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            InfoField::Ip => "ip",
            InfoField::Hostname => "hostname",
            InfoField::City => "city",
            InfoField::Region => "region",
            InfoField::Country => "country",
            InfoField::Location => "loc",
            InfoField::Organization => "org",
            InfoField::Postal => "postal",
            InfoField::Timezone => "timezone",
        }
    }
}

/// Parsed response for one lookup target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupResult {
    payload: Map<String, Value>,
}

impl LookupResult {
    /// Wrap a decoded response body.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Request`] for anything but a JSON object.
    pub fn from_json(value: Value) -> Result<Self, LookupError> {
        match value {
            Value::Object(payload) => Ok(Self { payload }),
            other => Err(LookupError::Request(format!(
                "expected a JSON object from ipinfo, got: {other}"
            ))),
        }
    }

    /// Display text for a field, or `None` when it is absent or empty.
    #[must_use]
    pub fn field(&self, field: InfoField) -> Option<String> {
        self.payload.get(field.key()).and_then(display_value)
    }

    /// Whether the provider flagged the target as a reserved address.
    #[must_use]
    pub fn is_bogon(&self) -> bool {
        self.payload.get("bogon").is_some_and(is_truthy)
    }

    /// Error reported by the provider inside a 200 response.
    ///
    /// ipinfo sends either a plain string or an object with `title` and
    /// `message`.
    #[must_use]
    pub fn provider_error(&self) -> Option<String> {
        let error = self.payload.get("error").filter(|v| is_truthy(v))?;
        if let Value::Object(details) = error {
            let title = details.get("title").and_then(Value::as_str);
            let message = details.get("message").and_then(Value::as_str);
            match (title, message) {
                (Some(title), Some(message)) => return Some(format!("{title}: {message}")),
                (Some(text), None) | (None, Some(text)) => return Some(text.to_string()),
                (None, None) => {}
            }
        }
        display_value(error)
    }

    /// Copy of this result with `key` removed from the payload.
    #[must_use]
    pub fn without(&self, key: &str) -> Self {
        let mut payload = self.payload.clone();
        payload.shift_remove(key);
        Self { payload }
    }

    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

impl From<Map<String, Value>> for LookupResult {
    fn from(payload: Map<String, Value>) -> Self {
        Self { payload }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn display_value(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    fn result(value: Value) -> LookupResult {
        LookupResult::from_json(value).expect("object payload")
    }

    #[test]
    fn fields_are_listed_in_card_order() {
        let keys: Vec<&str> = InfoField::iter().map(InfoField::key).collect();
        assert_eq!(
            keys,
            [
                "ip", "hostname", "city", "region", "country", "loc", "org", "postal", "timezone"
            ]
        );
        assert_eq!(InfoField::Location.to_string(), "Location (lat,long)");
    }

    #[test]
    fn empty_and_null_fields_are_absent() {
        let result = result(json!({
            "ip": "8.8.8.8",
            "hostname": "",
            "city": null,
            "postal": 0,
        }));
        assert_eq!(result.field(InfoField::Ip).as_deref(), Some("8.8.8.8"));
        assert_eq!(result.field(InfoField::Hostname), None);
        assert_eq!(result.field(InfoField::City), None);
        assert_eq!(result.field(InfoField::Postal), None);
        assert_eq!(result.field(InfoField::Region), None);
    }

    #[test]
    fn non_string_values_are_stringified() {
        let result = result(json!({ "postal": 10001 }));
        assert_eq!(result.field(InfoField::Postal).as_deref(), Some("10001"));
    }

    #[test]
    fn bogon_flag() {
        assert!(result(json!({ "ip": "10.0.0.1", "bogon": true })).is_bogon());
        assert!(!result(json!({ "ip": "8.8.8.8", "bogon": false })).is_bogon());
        assert!(!result(json!({ "ip": "8.8.8.8" })).is_bogon());
    }

    #[test]
    fn provider_error_shapes() {
        let plain = result(json!({ "error": "Wrong ip" }));
        assert_eq!(plain.provider_error().as_deref(), Some("Wrong ip"));

        let structured = result(json!({
            "error": { "title": "Wrong ip", "message": "Please provide a valid IP address" }
        }));
        assert_eq!(
            structured.provider_error().as_deref(),
            Some("Wrong ip: Please provide a valid IP address")
        );

        assert_eq!(result(json!({ "error": "" })).provider_error(), None);
        assert_eq!(result(json!({ "ip": "1.1.1.1" })).provider_error(), None);
    }

    #[test]
    fn rejects_non_object_payloads() {
        let err = LookupResult::from_json(json!(["8.8.8.8"])).expect_err("array payload");
        assert!(matches!(err, LookupError::Request(_)));
    }

    #[test]
    fn without_keeps_remaining_key_order() {
        let original = result(json!({ "ip": "1.1.1.1", "raw": "x", "city": "Sydney" }));
        let reduced = original.without("raw");
        let keys: Vec<&String> = reduced.payload().keys().collect();
        assert_eq!(keys, ["ip", "city"]);
        assert_eq!(original.payload().len(), 3);
    }
}
