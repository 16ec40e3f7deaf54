//! Dynamic values carried by remote commands.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Parameter map of a remote command.
pub type RpcParams = BTreeMap<String, RpcValue>;

/// A parameter value as delivered by the remote peer.
///
/// JSON numbers with an integral value become [`RpcValue::Int`]. Anything the
/// action schemas never accept (null, arrays, fractional numbers) is kept as
/// [`RpcValue::Unsupported`] so validation can name the field instead of the
/// whole request failing to decode.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcValue {
    String(String),
    Int(i64),
    Bool(bool),
    Map(RpcParams),
    Unsupported,
}

/// The variant of an [`RpcValue`], used by field schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Bool,
    Map,
    Unsupported,
}

impl RpcValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Int(_) => ValueKind::Int,
            Self::Bool(_) => ValueKind::Bool,
            Self::Map(_) => ValueKind::Map,
            Self::Unsupported => ValueKind::Unsupported,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&RpcParams> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for RpcValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for RpcValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for RpcValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u32> for RpcValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<bool> for RpcValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<RpcParams> for RpcValue {
    fn from(m: RpcParams) -> Self {
        Self::Map(m)
    }
}

impl From<serde_json::Value> for RpcValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                            Self::Int(f as i64)
                        }
                        _ => Self::Unsupported,
                    }
                }
            }
            serde_json::Value::Object(obj) => {
                Self::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            serde_json::Value::Null | serde_json::Value::Array(_) => Self::Unsupported,
        }
    }
}

impl From<&RpcValue> for serde_json::Value {
    fn from(value: &RpcValue) -> Self {
        match value {
            RpcValue::String(s) => serde_json::Value::String(s.clone()),
            RpcValue::Int(i) => serde_json::Value::from(*i),
            RpcValue::Bool(b) => serde_json::Value::Bool(*b),
            RpcValue::Map(m) => serde_json::Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
            RpcValue::Unsupported => serde_json::Value::Null,
        }
    }
}

impl Serialize for RpcValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RpcValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for RpcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Map(m) => write!(f, "{{{} entries}}", m.len()),
            Self::Unsupported => write!(f, "<unsupported>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_json_kinds() {
        let params: RpcParams = serde_json::from_str(
            r#"{"name":"main","width":640,"hide_frame":true,"nested":{"a":1},"gone":null}"#,
        )
        .unwrap();

        assert_eq!(params["name"], RpcValue::String("main".into()));
        assert_eq!(params["width"].as_int(), Some(640));
        assert_eq!(params["hide_frame"].as_bool(), Some(true));
        assert_eq!(params["nested"].kind(), ValueKind::Map);
        assert_eq!(params["gone"], RpcValue::Unsupported);
    }

    #[test]
    fn integral_float_becomes_int() {
        let v: RpcValue = serde_json::from_str("800.0").unwrap();
        assert_eq!(v, RpcValue::Int(800));

        let v: RpcValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(v, RpcValue::Unsupported);
    }

    #[test]
    fn arrays_are_unsupported() {
        let v: RpcValue = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(v.kind(), ValueKind::Unsupported);
        assert_eq!(v.as_str(), None);
    }

    #[test]
    fn serializes_back_to_plain_json() {
        let mut inner = RpcParams::new();
        inner.insert("name".into(), "side".into());
        let value = RpcValue::Map(inner);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"name":"side"}"#);
    }

    #[test]
    fn accessors_reject_other_kinds() {
        let v = RpcValue::Int(3);
        assert_eq!(v.as_str(), None);
        assert_eq!(v.as_bool(), None);
        assert!(v.as_map().is_none());
    }

    #[test]
    fn display_quotes_strings() {
        assert_eq!(RpcValue::from("x").to_string(), "\"x\"");
        assert_eq!(RpcValue::from(true).to_string(), "true");
        assert_eq!(RpcValue::Unsupported.to_string(), "<unsupported>");
    }
}
