//! Dynamic column values.

use bytes::Bytes;
use std::fmt;

/// Value enum representing a single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value.
    Null,
    /// String value.
    String(String),
    /// 64-bit signed integer value.
    Integer(i64),
    /// Double precision floating point value.
    Double(f64),
    /// Boolean value.
    Boolean(bool),
    /// Binary value.
    Binary(Bytes),
    /// Lower bound sentinel used by range reads on primary keys.
    InfMin,
    /// Upper bound sentinel used by range reads on primary keys.
    InfMax,
    /// Placeholder for a primary key the store fills in on write.
    AutoIncrement,
}

impl Value {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Double(_) => "double",
            Value::Boolean(_) => "boolean",
            Value::Binary(_) => "binary",
            Value::InfMin => "inf_min",
            Value::InfMax => "inf_max",
            Value::AutoIncrement => "auto_increment",
        }
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Binary(bytes) => write!(f, "<BINARY: {} bytes>", bytes.len()),
            Value::InfMin => write!(f, "INF_MIN"),
            Value::InfMax => write!(f, "INF_MAX"),
            Value::AutoIncrement => write!(f, "AUTO_INCREMENT"),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Binary(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(Bytes::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_null() {
        let val = Value::Null;
        assert!(val.is_null());
        assert_eq!(val.as_str(), None);
        assert_eq!(format!("{}", val), "NULL");
    }

    #[test]
    fn test_value_accessors_are_strict() {
        let val = Value::from("42");
        assert_eq!(val.as_str(), Some("42"));
        assert_eq!(val.as_i64(), None);

        let val = Value::from(42);
        assert_eq!(val.as_i64(), Some(42));
        assert_eq!(val.as_f64(), None);
        assert_eq!(val.type_name(), "integer");
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Boolean(true));
    }

    #[test]
    fn test_value_display_binary() {
        let val = Value::from(vec![1u8, 2, 3]);
        assert_eq!(val.as_bytes(), Some(&[1u8, 2, 3][..]));
        assert_eq!(format!("{}", val), "<BINARY: 3 bytes>");
    }
}
