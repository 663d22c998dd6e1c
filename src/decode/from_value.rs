//! Strict conversions from column values into field types.
//!
//! No coercion happens here: a string never parses into a number, a double
//! never truncates into an integer. Integer fields narrower than `i64` accept
//! a value only when it fits.

use bytes::Bytes;

use crate::types::Value;

/// A field type that can be assigned from a column value.
pub trait FromValue: Sized {
    /// Human-readable name of the accepted value type.
    const EXPECTED: &'static str;

    /// Convert the value, or return `None` if the types are incompatible.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "double";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Double(n) => Some(n),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }
}

impl FromValue for Bytes {
    const EXPECTED: &'static str = "binary";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl FromValue for Vec<u8> {
    const EXPECTED: &'static str = "binary";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Binary(bytes) => Some(bytes.to_vec()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            value => T::from_value(value).map(Some),
        }
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const EXPECTED: &'static str = concat!("integer (", stringify!($ty), ")");

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Integer(n) => <$ty>::try_from(n).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
