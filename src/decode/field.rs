//! Column-name to field resolution for struct destinations.
//!
//! A `Record` registers its annotated fields into a `FieldMap`, recursing
//! into flattened structs so that nested fields share one namespace. The
//! resulting map holds one setter per column name. A setter converts the
//! column value first and only then walks the accessor chain down to the leaf
//! field, allocating `Option`/`Box` links on the way when the derive asks for
//! it.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::from_value::FromValue;
use crate::error::{Error, Result};
use crate::types::Column;
use crate::LOG_TARGET;

/// Write of an already converted value into a record.
type Write<T> = Box<dyn FnOnce(&mut T)>;

/// Converts one column into a pending write.
type Setter<T> = Arc<dyn Fn(Column) -> Result<Write<T>> + Send + Sync>;

/// A struct destination whose fields are bound to column names.
///
/// Usually derived:
///
/// ```
/// use rowscan::Record;
///
/// #[derive(Record, Default)]
/// struct People {
///     #[column(name = "name")]
///     name: String,
///     #[column(name = "age")]
///     age: i64,
/// }
///
/// #[derive(Record, Default)]
/// struct Student {
///     #[column(flatten)]
///     people: Option<Box<People>>,
///     #[column(name = "no")]
///     no: String,
/// }
/// ```
///
/// Hand-written impls register fields in declaration order with
/// [`FieldMap::field`] and [`FieldMap::flatten`].
pub trait Record: Default + 'static {
    /// Register every annotated field of `Self`.
    fn resolve(fields: &mut FieldMap<Self>);
}

/// Mapping from column name to the field that receives it.
pub struct FieldMap<T> {
    setters: HashMap<String, Setter<T>>,
    /// Types on the current flatten path, used to cut recursive records.
    ancestors: Vec<TypeId>,
}

impl<T: 'static> FieldMap<T> {
    /// Create an empty field map.
    pub fn new() -> Self {
        Self::with_ancestors(Vec::new())
    }

    fn with_ancestors(mut ancestors: Vec<TypeId>) -> Self {
        ancestors.push(TypeId::of::<T>());
        Self {
            setters: HashMap::new(),
            ancestors,
        }
    }

    /// Bind the column `name` to the field returned by `access`.
    ///
    /// An empty name leaves the field unmapped. A name registered twice keeps
    /// the later binding.
    pub fn field<V, F>(&mut self, name: &str, access: F) -> &mut Self
    where
        V: FromValue + 'static,
        F: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        if name.is_empty() {
            return self;
        }
        let access = Arc::new(access);
        let setter: Setter<T> = Arc::new(move |column: Column| {
            let actual = column.value.type_name();
            let Some(value) = V::from_value(column.value) else {
                return Err(Error::type_mismatch(column.name, V::EXPECTED, actual));
            };
            let access = Arc::clone(&access);
            Ok(Box::new(move |record: &mut T| *access(record) = value) as Write<T>)
        });
        self.insert(name.to_owned(), setter);
        self
    }

    /// Merge the fields of the nested record returned by `access`.
    ///
    /// The accessor runs on every write through the nested record, after the
    /// column value has been converted, so an accessor that allocates (e.g.
    /// `Option::get_or_insert_with`) only does so when a matching column
    /// converts successfully. A record that flattens itself, directly or
    /// further down, stops at the first repetition.
    pub fn flatten<U, F>(&mut self, access: F) -> &mut Self
    where
        U: Record,
        F: Fn(&mut T) -> &mut U + Send + Sync + 'static,
    {
        if self.ancestors.contains(&TypeId::of::<U>()) {
            tracing::warn!(
                target: LOG_TARGET,
                "recursive flatten of `{}` into `{}` ignored",
                std::any::type_name::<U>(),
                std::any::type_name::<T>(),
            );
            return self;
        }

        let mut nested = FieldMap::<U>::with_ancestors(self.ancestors.clone());
        U::resolve(&mut nested);

        let access = Arc::new(access);
        for (name, setter) in nested.setters {
            let access = Arc::clone(&access);
            let setter: Setter<T> = Arc::new(move |column: Column| {
                let write = setter(column)?;
                let access = Arc::clone(&access);
                Ok(Box::new(move |record: &mut T| write(access(record))) as Write<T>)
            });
            self.insert(name, setter);
        }
        self
    }

    fn insert(&mut self, name: String, setter: Setter<T>) {
        if self.setters.contains_key(&name) {
            tracing::warn!(
                target: LOG_TARGET,
                "duplicate column `{}` in `{}`, later field wins",
                name,
                std::any::type_name::<T>(),
            );
        }
        self.setters.insert(name, setter);
    }

    /// Write a column into its mapped field.
    ///
    /// Returns `Ok(false)` when no field is bound to the column's name.
    pub fn set(&self, record: &mut T, column: Column) -> Result<bool> {
        match self.setters.get(&column.name) {
            Some(setter) => {
                let write = setter(column)?;
                write(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Check if a column name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// Get the bound column names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.setters.keys().map(String::as_str)
    }

    /// Get the number of bound columns.
    pub fn len(&self) -> usize {
        self.setters.len()
    }

    /// Check if no column is bound.
    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }
}

impl<T: Record> FieldMap<T> {
    /// Build the field map of a record type.
    pub fn resolve() -> Self {
        let mut fields = Self::new();
        T::resolve(&mut fields);
        tracing::debug!(
            target: LOG_TARGET,
            "resolved {} fields for `{}`",
            fields.len(),
            std::any::type_name::<T>(),
        );
        fields
    }
}

impl<T: 'static> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.setters.keys().collect();
        names.sort();
        f.debug_struct("FieldMap")
            .field("type", &std::any::type_name::<T>())
            .field("columns", &names)
            .finish()
    }
}

/// Resolved field maps keyed by record type.
///
/// Shared behind a read-mostly lock; resolution happens at most once per type
/// for the lifetime of the cache.
#[derive(Default)]
pub struct FieldMapCache {
    maps: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl FieldMapCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the field map of `T`, resolving it on first use.
    pub fn get_or_resolve<T: Record>(&self) -> Arc<FieldMap<T>> {
        let key = TypeId::of::<T>();
        if let Some(map) = self.maps.read().get(&key) {
            if let Ok(map) = Arc::clone(map).downcast::<FieldMap<T>>() {
                return map;
            }
        }

        let resolved: Arc<dyn Any + Send + Sync> = Arc::new(FieldMap::<T>::resolve());
        let map = Arc::clone(self.maps.write().entry(key).or_insert(resolved));
        match map.downcast::<FieldMap<T>>() {
            Ok(map) => map,
            // Entries are only ever inserted under their own `TypeId`.
            Err(_) => Arc::new(FieldMap::<T>::resolve()),
        }
    }

    /// Get the number of cached types.
    pub fn len(&self) -> usize {
        self.maps.read().len()
    }

    /// Check if nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.maps.read().is_empty()
    }

    /// Drop every cached map.
    pub fn clear(&self) {
        self.maps.write().clear();
    }
}

impl fmt::Debug for FieldMapCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapCache")
            .field("types", &self.len())
            .finish()
    }
}
