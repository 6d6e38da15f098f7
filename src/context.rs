use chrono::{DateTime, Utc};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::ops::Index;

/// Supported evaluation context attribute value types.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// String attribute value.
    String(String),
    /// Boolean attribute value.
    Bool(bool),
    /// Signed integer attribute value.
    Int(i64),
    /// Unsigned integer attribute value.
    UInt(u64),
    /// Float attribute value.
    Float(f64),
    /// Datetime attribute value.
    DateTime(DateTime<Utc>),
    /// String vector attribute value.
    StringVec(Vec<String>),
}

impl Display for ContextValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextValue::String(val) => f.write_str(val),
            ContextValue::Bool(val) => write!(f, "{val}"),
            ContextValue::Int(val) => write!(f, "{val}"),
            ContextValue::UInt(val) => write!(f, "{val}"),
            ContextValue::Float(val) => write!(f, "{val}"),
            ContextValue::DateTime(val) => f.write_str(val.to_rfc3339().as_str()),
            ContextValue::StringVec(val) => write!(f, "[{}]", val.join(", ")),
        }
    }
}

impl Serialize for ContextValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ContextValue::String(val) => serializer.serialize_str(val),
            ContextValue::Bool(val) => serializer.serialize_bool(*val),
            ContextValue::Int(val) => serializer.serialize_i64(*val),
            ContextValue::UInt(val) => serializer.serialize_u64(*val),
            ContextValue::Float(val) => serializer.serialize_f64(*val),
            ContextValue::DateTime(val) => serializer.serialize_str(val.to_rfc3339().as_str()),
            ContextValue::StringVec(val) => {
                let mut seq = serializer.serialize_seq(Some(val.len()))?;
                for element in val {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
        }
    }
}

/// Caller-supplied attributes that may influence which variant of a flag is selected.
///
/// The provider treats the context as opaque; only [`crate::VariantEvaluator`]
/// implementations read it.
///
/// # Examples:
///
/// ```rust
/// use inmemory_flags::EvaluationContext;
///
/// use std::str::FromStr;
/// use chrono::{DateTime, Utc};
///
/// let context = EvaluationContext::new("user-id")
///     .custom("Rating", 4.5)
///     .custom("RegisteredAt", DateTime::<Utc>::from_str("2023-06-14T15:27:15.8440000Z").unwrap())
///     .custom("Roles", vec!["Role1", "Role2"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    targeting_key: Option<String>,
    attributes: HashMap<String, ContextValue>,
}

impl EvaluationContext {
    /// Initializes a new [`EvaluationContext`] with a targeting key.
    pub fn new(targeting_key: &str) -> Self {
        Self {
            targeting_key: Some(targeting_key.to_owned()),
            attributes: HashMap::new(),
        }
    }

    /// Initializes a new [`EvaluationContext`] without a targeting key.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Adds a custom attribute. Replaces any previous value under the same key.
    pub fn custom<T: Into<ContextValue>>(mut self, key: &str, value: T) -> Self {
        self.attributes.insert(key.to_owned(), value.into());
        self
    }

    /// The targeting key (usually a user or session identifier), if set.
    pub fn targeting_key(&self) -> Option<&str> {
        self.targeting_key.as_deref()
    }

    /// Reads an attribute.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.attributes.get(key)
    }

    /// Iterates over all attributes.
    pub fn attributes(&self) -> impl Iterator<Item = (&String, &ContextValue)> {
        self.attributes.iter()
    }

    /// True if neither a targeting key nor any attribute is set.
    pub fn is_empty(&self) -> bool {
        self.targeting_key.is_none() && self.attributes.is_empty()
    }
}

impl Index<&str> for EvaluationContext {
    type Output = ContextValue;

    /// Panics if the attribute is missing, use [`EvaluationContext::get`] otherwise.
    fn index(&self, key: &str) -> &Self::Output {
        &self.attributes[key]
    }
}

impl Display for EvaluationContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(str) => write!(f, "{str}"),
            Err(_) => f.write_str("<invalid context>"),
        }
    }
}

impl From<Vec<&str>> for ContextValue {
    fn from(value: Vec<&str>) -> Self {
        let str_vec = value.iter().map(|x| x.to_string()).collect();
        Self::StringVec(str_vec)
    }
}

from_val_to_enum!(ContextValue String String);
from_val_to_enum!(ContextValue Bool bool);
from_val_to_enum!(ContextValue DateTime DateTime<Utc>);
from_val_to_enum!(ContextValue StringVec Vec<String>);
from_val_to_enum_into!(ContextValue Float f64 f32);
from_val_to_enum_into!(ContextValue UInt u8 u16 u32 u64);
from_val_to_enum_into!(ContextValue Int i8 i16 i32 i64);
from_val_to_enum_into!(ContextValue String &str);
