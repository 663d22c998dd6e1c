//! Decoder for map destinations.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::field::FieldMapCache;
use super::{Decoder, Target};
use crate::error::Result;
use crate::types::{Column, Value};

/// A map keyed by column name.
pub trait MapTarget {
    /// Insert a column, replacing any earlier value under the same name.
    fn insert_column(&mut self, name: String, value: Value);
}

impl<S: BuildHasher> MapTarget for HashMap<String, Value, S> {
    fn insert_column(&mut self, name: String, value: Value) {
        self.insert(name, value);
    }
}

impl MapTarget for BTreeMap<String, Value> {
    fn insert_column(&mut self, name: String, value: Value) {
        self.insert(name, value);
    }
}

/// Inserts every column as a `name -> value` entry.
///
/// Values are stored as is, so decoding into a map never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapDecoder;

impl<M: MapTarget> Decoder<M> for MapDecoder {
    fn decode(
        &self,
        primary_keys: Vec<Column>,
        attributes: Vec<Column>,
        dest: &mut M,
    ) -> Result<()> {
        for column in primary_keys.into_iter().chain(attributes) {
            let (name, value) = column.into_parts();
            dest.insert_column(name, value);
        }
        Ok(())
    }
}

impl<S: BuildHasher + Default> Target for HashMap<String, Value, S> {
    type Decoder = MapDecoder;

    fn decoder(_cache: &FieldMapCache) -> Self::Decoder {
        MapDecoder
    }

    fn blank() -> Self {
        HashMap::default()
    }
}

impl Target for BTreeMap<String, Value> {
    type Decoder = MapDecoder;

    fn decoder(_cache: &FieldMapCache) -> Self::Decoder {
        MapDecoder
    }

    fn blank() -> Self {
        BTreeMap::new()
    }
}
