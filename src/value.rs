use crate::ValueKind;
use std::fmt::{Display, Formatter};

/// A structured flag value: a JSON object.
pub type Structure = serde_json::Map<String, serde_json::Value>;

/// Represents the value of one flag variant.
///
/// # Examples
///
/// ```rust
/// use inmemory_flags::Value;
///
/// let bool_val = Value::Bool(true);
/// let int_val = Value::Int(42);
/// ```
#[derive(PartialEq, Debug, Clone)]
pub enum Value {
    /// An on/off value.
    Bool(bool),
    /// A whole number value.
    Int(i64),
    /// A decimal number value.
    Float(f64),
    /// A text value.
    String(String),
    /// A structured document value.
    Structure(Structure),
}

impl Value {
    /// Returns the [`ValueKind`] tag of the value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Structure(_) => ValueKind::Structure,
        }
    }

    /// Reads the value as `bool`. Returns [`None`] if it's not a [`Value::Bool`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inmemory_flags::Value;
    ///
    /// let value = Value::Bool(true);
    /// assert!(value.as_bool().unwrap());
    /// ```
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as `i64`. Returns [`None`] if it's not a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        if let Value::Int(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as `f64`. Returns [`None`] if it's not a [`Value::Float`].
    ///
    /// Whole numbers are not widened, an `Int` variant never resolves as `f64`.
    pub fn as_float(&self) -> Option<f64> {
        if let Value::Float(val) = self {
            return Some(*val);
        }
        None
    }

    /// Reads the value as `&str`. Returns [`None`] if it's not a [`Value::String`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inmemory_flags::Value;
    ///
    /// let value = Value::from("foo");
    /// assert_eq!(value.as_str().unwrap(), "foo");
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(val) = self {
            return Some(val.as_str());
        }
        None
    }

    /// Reads the value as a [`Structure`]. Returns [`None`] if it's not a [`Value::Structure`].
    pub fn as_structure(&self) -> Option<&Structure> {
        if let Value::Structure(val) = self {
            return Some(val);
        }
        None
    }

    /// Creates a [`Value`] from a [`serde_json::Value`]. Returns [`None`] for `null` and arrays.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inmemory_flags::Value;
    ///
    /// let json_str = serde_json::Value::String("foo".to_owned());
    /// assert_eq!(Value::from("foo"), Value::from_json_val(&json_str).unwrap())
    /// ```
    pub fn from_json_val(json_val: &serde_json::Value) -> Option<Value> {
        match json_val {
            serde_json::Value::Bool(val) => Some(Value::Bool(*val)),
            serde_json::Value::String(val) => Some(Value::String(val.clone())),
            serde_json::Value::Number(val) => {
                if let Some(int_val) = val.as_i64() {
                    return Some(Value::Int(int_val));
                }
                if let Some(float_val) = val.as_f64() {
                    return Some(Value::Float(float_val));
                }
                None
            }
            serde_json::Value::Object(val) => Some(Value::Structure(val.clone())),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(val) => write!(f, "{val}"),
            Value::Int(val) => write!(f, "{val}"),
            Value::Float(val) => write!(f, "{val}"),
            Value::String(val) => f.write_str(val),
            Value::Structure(val) => write!(f, "{}", serde_json::Value::Object(val.clone())),
        }
    }
}

/// Represents a type a flag can be resolved to.
///
/// Implemented for `bool`, `i64`, `f64`, [`String`] and [`Structure`].
pub trait ValuePrimitive: Into<Value> + Clone {
    /// The [`ValueKind`] every value of this type has.
    const KIND: ValueKind;

    /// Reads the primitive value from a [`Value`]. Returns [`None`] on kind mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! primitive_impl {
    ($ob:ident $to:ident $kind:ident $t:ty, |$v:ident| $read:expr) => (
        from_val_to_enum!($ob $to $t);

        impl ValuePrimitive for $t {
            const KIND: ValueKind = ValueKind::$kind;

            fn from_value($v: &Value) -> Option<Self> {
                $read
            }
        }
    )
}

primitive_impl!(Value String String String, |value| value.as_str().map(str::to_owned));
primitive_impl!(Value Float Float f64, |value| value.as_float());
primitive_impl!(Value Int Int i64, |value| value.as_int());
primitive_impl!(Value Bool Bool bool, |value| value.as_bool());
primitive_impl!(Value Structure Structure Structure, |value| value.as_structure().cloned());
from_val_to_enum_into!(Value String &str);
from_val_to_enum_into!(Value Int i32);
