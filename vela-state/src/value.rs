//! Output values extracted from a state document

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// A single output value, preserving the nested structure of the source
/// document
///
/// Numbers keep `serde_json`'s arbitrary-precision representation so that
/// integers survive a round trip without becoming floats.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<OutputValue>),
    Map(BTreeMap<String, OutputValue>),
}

impl OutputValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Convert back into a plain JSON value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(OutputValue::to_json).collect())
            }
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for OutputValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(OutputValue::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, OutputValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for OutputValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// One named output as declared in the state document
#[derive(Clone, PartialEq, Serialize)]
pub struct StateOutput {
    pub value: OutputValue,
    /// Marked sensitive in the source document; must not be logged in
    /// plaintext
    pub sensitive: bool,
}

impl StateOutput {
    pub fn new(value: OutputValue, sensitive: bool) -> Self {
        Self { value, sensitive }
    }
}

impl fmt::Debug for StateOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("StateOutput");
        if self.sensitive {
            debug.field("value", &"[REDACTED]")
        } else {
            debug.field("value", &self.value)
        }
        .field("sensitive", &self.sensitive)
        .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(OutputValue::from(json!(null)), OutputValue::Null);
        assert_eq!(OutputValue::from(json!(true)), OutputValue::Bool(true));
        assert_eq!(
            OutputValue::from(json!("vpc-123")),
            OutputValue::String("vpc-123".to_string())
        );
        assert_eq!(OutputValue::from(json!(42)).as_i64(), Some(42));
    }

    #[test]
    fn test_from_json_nested() {
        let value = OutputValue::from(json!({
            "cidr": "10.0.0.0/16",
            "subnets": ["subnet-1", "subnet-2"],
        }));

        let OutputValue::Map(entries) = &value else {
            panic!("Expected a map");
        };
        assert_eq!(entries["cidr"].as_str(), Some("10.0.0.0/16"));
        assert_eq!(
            entries["subnets"],
            OutputValue::List(vec![
                OutputValue::String("subnet-1".to_string()),
                OutputValue::String("subnet-2".to_string()),
            ])
        );
    }

    #[test]
    fn test_to_json_round_trip() {
        let original = json!({
            "count": 3,
            "enabled": false,
            "tags": {"env": "prod"},
            "ids": ["a", "b"],
            "nothing": null,
        });

        assert_eq!(OutputValue::from(original.clone()).to_json(), original);
    }

    #[test]
    fn test_integer_precision_preserved() {
        let value = OutputValue::from(json!(9007199254740993_i64));
        assert_eq!(value.as_i64(), Some(9007199254740993));
    }

    #[test]
    fn test_sensitive_output_debug_is_redacted() {
        let output = StateOutput::new(OutputValue::String("hunter2".to_string()), true);
        let debug_output = format!("{:?}", output);

        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_plain_output_debug_shows_value() {
        let output = StateOutput::new(OutputValue::String("vpc-123".to_string()), false);
        assert!(format!("{:?}", output).contains("vpc-123"));
    }
}
