//! Decoder for `Record` structs.

use std::fmt;
use std::sync::Arc;

use super::field::{FieldMap, FieldMapCache, Record};
use super::Decoder;
use crate::error::{Error, Result};
use crate::types::Column;
use crate::LOG_TARGET;

/// Writes columns into the fields of a record through its field map.
///
/// Columns without a bound field are dropped. Primary keys are written
/// before attributes, so an attribute wins over a primary key bound to the
/// same field.
pub struct StructDecoder<T> {
    fields: Arc<FieldMap<T>>,
}

impl<T: Record> StructDecoder<T> {
    /// Create a decoder over an already resolved field map.
    ///
    /// An empty map is resolved again from `T` when a row is decoded.
    pub fn new(fields: Arc<FieldMap<T>>) -> Self {
        Self { fields }
    }

    /// Create a decoder by resolving `T`'s field map.
    pub fn resolve() -> Self {
        Self::new(Arc::new(FieldMap::resolve()))
    }

    /// Create a decoder sharing `T`'s field map from `cache`.
    pub fn from_cache(cache: &FieldMapCache) -> Self {
        Self::new(cache.get_or_resolve::<T>())
    }

    /// Get the field map in use.
    pub fn fields(&self) -> &FieldMap<T> {
        &self.fields
    }
}

impl<T: Record> Default for StructDecoder<T> {
    fn default() -> Self {
        Self::new(Arc::new(FieldMap::new()))
    }
}

impl<T> Clone for StructDecoder<T> {
    fn clone(&self) -> Self {
        Self {
            fields: Arc::clone(&self.fields),
        }
    }
}

impl<T> fmt::Debug for StructDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructDecoder")
            .field("fields", &self.fields)
            .finish()
    }
}

impl<T: Record> Decoder<T> for StructDecoder<T> {
    fn decode(
        &self,
        primary_keys: Vec<Column>,
        attributes: Vec<Column>,
        dest: &mut T,
    ) -> Result<()> {
        let resolved;
        let fields = if self.fields.is_empty() {
            resolved = FieldMap::<T>::resolve();
            &resolved
        } else {
            &*self.fields
        };

        if fields.is_empty() {
            return Err(Error::no_annotated_fields::<T>());
        }

        for column in primary_keys.into_iter().chain(attributes) {
            if !fields.contains(&column.name) {
                tracing::trace!(target: LOG_TARGET, "dropped unbound column `{}`", column.name);
                continue;
            }
            fields.set(dest, column)?;
        }
        Ok(())
    }
}
