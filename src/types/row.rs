//! Row type split into primary-key and attribute columns.

use super::column::Column;
use super::value::Value;

/// A row as returned by a table store.
///
/// Primary-key columns and attribute columns are kept apart and in the order
/// the store returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Primary-key columns.
    primary_keys: Vec<Column>,
    /// Attribute columns.
    attributes: Vec<Column>,
}

impl Row {
    /// Create a new row from its two column sequences.
    pub fn new(primary_keys: Vec<Column>, attributes: Vec<Column>) -> Self {
        Self {
            primary_keys,
            attributes,
        }
    }

    /// Append a primary-key column.
    pub fn with_primary_key(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.primary_keys.push(Column::new(name, value));
        self
    }

    /// Append an attribute column.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push(Column::new(name, value));
        self
    }

    /// Get the primary-key columns.
    pub fn primary_keys(&self) -> &[Column] {
        &self.primary_keys
    }

    /// Get the attribute columns.
    pub fn attributes(&self) -> &[Column] {
        &self.attributes
    }

    /// Get a value by column name.
    ///
    /// Attributes shadow primary keys of the same name, matching decode order.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .rev()
            .chain(self.primary_keys.iter().rev())
            .find(|c| c.name == name)
            .map(|c| &c.value)
    }

    /// Get the total number of columns.
    pub fn len(&self) -> usize {
        self.primary_keys.len() + self.attributes.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.primary_keys.is_empty() && self.attributes.is_empty()
    }

    /// Iterate over all columns in decode order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.primary_keys.iter().chain(self.attributes.iter())
    }

    /// Split the row into primary-key and attribute columns.
    pub fn into_parts(self) -> (Vec<Column>, Vec<Column>) {
        (self.primary_keys, self.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_row() -> Row {
        Row::default()
            .with_primary_key("id", 1)
            .with_primary_key("name", "pk")
            .with_attribute("name", "attr")
            .with_attribute("age", 28)
    }

    #[test]
    fn test_row_access() {
        let row = make_test_row();

        assert_eq!(row.len(), 4);
        assert!(!row.is_empty());
        assert_eq!(row.get("id"), Some(&Value::Integer(1)));
        assert_eq!(row.get("name"), Some(&Value::from("attr")));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_row_iter_order() {
        let row = make_test_row();
        let names: Vec<&str> = row.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "name", "age"]);

        let (pks, attrs) = row.into_parts();
        assert_eq!(pks.len(), 2);
        assert_eq!(attrs.len(), 2);
    }
}
