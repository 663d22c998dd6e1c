//! Named column values.

use super::value::Value;

/// A single named value within a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column value.
    pub value: Value,
}

impl Column {
    /// Create a column from a name and anything convertible to a value.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Split the column into its name and value.
    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}

impl<N: Into<String>, V: Into<Value>> From<(N, V)> for Column {
    fn from((name, value): (N, V)) -> Self {
        Column::new(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_tuple() {
        let col: Column = ("age", 28).into();
        assert_eq!(col.name, "age");
        assert_eq!(col.value, Value::Integer(28));

        let (name, value) = col.into_parts();
        assert_eq!(name, "age");
        assert_eq!(value.as_i64(), Some(28));
    }
}
