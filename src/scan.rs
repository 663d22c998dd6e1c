//! Scan entry points: decode one row, decode many rows, or pick by shape.
//!
//! Every entry point returns `Ok(())` without touching the destination when
//! the source reports no rows.

use crate::decode::{Decoder, FieldMapCache, Target};
use crate::error::{Error, Result};
use crate::source::RowSource;
use crate::LOG_TARGET;

/// What `scan_many` does when the source yields fewer rows than it reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShortRead {
    /// Skip missing slots; the result is shorter than the reported length.
    #[default]
    Skip,
    /// Fail with `Error::ShortRead` once the scan finishes.
    Fail,
}

/// Options for a `Scanner`.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Short read policy for `scan_many`.
    pub short_read: ShortRead,
    /// Whether resolved field maps are kept between calls.
    pub cache_field_maps: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            short_read: ShortRead::Skip,
            cache_field_maps: true,
        }
    }
}

impl ScanOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the short read policy.
    pub fn with_short_read(mut self, short_read: ShortRead) -> Self {
        self.short_read = short_read;
        self
    }

    /// Enable or disable field map caching.
    pub fn with_field_map_cache(mut self, enabled: bool) -> Self {
        self.cache_field_maps = enabled;
        self
    }
}

/// Decodes rows into destinations, caching field maps per record type.
///
/// A scanner can be shared between threads; each call still needs exclusive
/// access to its own source and destination.
///
/// # Example
///
/// ```
/// use rowscan::{Record, Row, RowSet, Scanner};
///
/// #[derive(Record, Default, Debug)]
/// struct User {
///     #[column(name = "id")]
///     id: i64,
///     #[column(name = "name")]
///     name: String,
/// }
///
/// let mut rows: RowSet = vec![
///     Row::default().with_primary_key("id", 1).with_attribute("name", "yuzj"),
///     Row::default().with_primary_key("id", 2).with_attribute("name", "zhouhan"),
/// ]
/// .into_iter()
/// .collect();
///
/// let scanner = Scanner::new();
/// let mut users: Vec<User> = Vec::new();
/// scanner.scan_many(&mut rows, &mut users)?;
///
/// assert_eq!(users.len(), 2);
/// assert_eq!(users[1].name, "zhouhan");
/// # Ok::<(), rowscan::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Scanner {
    options: ScanOptions,
    cache: FieldMapCache,
}

impl Scanner {
    /// Create a scanner with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with the given options.
    pub fn with_options(options: ScanOptions) -> Self {
        Self {
            options,
            cache: FieldMapCache::new(),
        }
    }

    /// Get the scanner options.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Get the field map cache.
    pub fn cache(&self) -> &FieldMapCache {
        &self.cache
    }

    fn decoder<T: Target>(&self) -> T::Decoder {
        if self.options.cache_field_maps {
            T::decoder(&self.cache)
        } else {
            T::decoder(&FieldMapCache::new())
        }
    }

    /// Decode the first row of `source` into `dest`.
    ///
    /// Fails with `Error::EmptyRows` if the source reports rows but yields
    /// none after a reset.
    pub fn scan_one<S, T>(&self, source: &mut S, dest: &mut T) -> Result<()>
    where
        S: RowSource + ?Sized,
        T: Target,
    {
        if source.is_empty() {
            return Ok(());
        }

        let decoder = self.decoder::<T>();
        source.reset();
        let Some(row) = source.next_row() else {
            return Err(Error::EmptyRows);
        };

        tracing::debug!(
            target: LOG_TARGET,
            "scan one `{}` from {} columns",
            std::any::type_name::<T>(),
            row.len(),
        );
        let (primary_keys, attributes) = row.into_parts();
        decoder.decode(primary_keys, attributes, dest)
    }

    /// Decode every row of `source` into `dest`, replacing its contents.
    ///
    /// Rows are appended in source order. An error aborts the scan and leaves
    /// the elements decoded so far in `dest`.
    pub fn scan_many<S, T>(&self, source: &mut S, dest: &mut Vec<T>) -> Result<()>
    where
        S: RowSource + ?Sized,
        T: Target,
    {
        let expected = source.len();
        if expected == 0 {
            return Ok(());
        }

        let decoder = self.decoder::<T>();
        dest.clear();
        dest.reserve(expected);

        source.reset();
        let mut read = 0;
        for slot in 0..expected {
            let Some(row) = source.next_row() else {
                tracing::trace!(target: LOG_TARGET, "no row for slot {}", slot);
                continue;
            };
            read += 1;

            let mut elem = T::blank();
            let (primary_keys, attributes) = row.into_parts();
            decoder.decode(primary_keys, attributes, &mut elem)?;
            dest.push(elem);
        }

        if read < expected {
            match self.options.short_read {
                ShortRead::Skip => tracing::warn!(
                    target: LOG_TARGET,
                    "source reported {} rows, yielded {}",
                    expected,
                    read,
                ),
                ShortRead::Fail => return Err(Error::ShortRead { expected, read }),
            }
        }

        tracing::debug!(
            target: LOG_TARGET,
            "scan many `{}`: {} rows",
            std::any::type_name::<T>(),
            dest.len(),
        );
        Ok(())
    }

    /// Decode into a single destination or a vector, depending on its type.
    pub fn unmarshal<S, D>(&self, source: &mut S, dest: &mut D) -> Result<()>
    where
        S: RowSource + ?Sized,
        D: Unmarshal + ?Sized,
    {
        dest.unmarshal_with(self, source)
    }
}

/// Destinations accepted by `unmarshal`.
///
/// Single targets decode one row; vectors decode all rows. A boxed vector is
/// unwrapped and decoded like the vector itself.
pub trait Unmarshal {
    /// Decode rows from `source` using `scanner`.
    fn unmarshal_with<S: RowSource + ?Sized>(
        &mut self,
        scanner: &Scanner,
        source: &mut S,
    ) -> Result<()>;
}

impl<T: Target> Unmarshal for T {
    fn unmarshal_with<S: RowSource + ?Sized>(
        &mut self,
        scanner: &Scanner,
        source: &mut S,
    ) -> Result<()> {
        scanner.scan_one(source, self)
    }
}

impl<T: Target> Unmarshal for Vec<T> {
    fn unmarshal_with<S: RowSource + ?Sized>(
        &mut self,
        scanner: &Scanner,
        source: &mut S,
    ) -> Result<()> {
        scanner.scan_many(source, self)
    }
}

impl<T: Target> Unmarshal for Box<Vec<T>> {
    fn unmarshal_with<S: RowSource + ?Sized>(
        &mut self,
        scanner: &Scanner,
        source: &mut S,
    ) -> Result<()> {
        scanner.scan_many(source, &mut **self)
    }
}

/// Decode the first row of `source` into a struct or map.
///
/// Field maps are resolved for this call only; use a `Scanner` to reuse them.
pub fn scan_one<S, T>(source: &mut S, dest: &mut T) -> Result<()>
where
    S: RowSource + ?Sized,
    T: Target,
{
    Scanner::new().scan_one(source, dest)
}

/// Decode every row of `source` into a vector of structs, boxed structs or maps.
pub fn scan_many<S, T>(source: &mut S, dest: &mut Vec<T>) -> Result<()>
where
    S: RowSource + ?Sized,
    T: Target,
{
    Scanner::new().scan_many(source, dest)
}

/// Decode into `dest`, scanning one row or all rows depending on its type.
pub fn unmarshal<S, D>(source: &mut S, dest: &mut D) -> Result<()>
where
    S: RowSource + ?Sized,
    D: Unmarshal + ?Sized,
{
    Scanner::new().unmarshal(source, dest)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::decode::{FieldMap, Record, StructDecoder};
    use crate::source::RowSet;
    use crate::types::{Row, Value};

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        key: String,
        count: i64,
    }

    impl Record for Pair {
        fn resolve(fields: &mut FieldMap<Self>) {
            fields
                .field("key", |p: &mut Self| &mut p.key)
                .field("count", |p: &mut Self| &mut p.count);
        }
    }

    impl Target for Pair {
        type Decoder = StructDecoder<Self>;

        fn decoder(cache: &FieldMapCache) -> Self::Decoder {
            StructDecoder::from_cache(cache)
        }

        fn blank() -> Self {
            Self::default()
        }
    }

    /// Source that reports more rows than it yields.
    struct ShortSource {
        inner: RowSet,
        reported: usize,
    }

    impl RowSource for ShortSource {
        fn len(&self) -> usize {
            self.reported
        }

        fn reset(&mut self) {
            self.inner.reset()
        }

        fn next_row(&mut self) -> Option<Row> {
            self.inner.next_row()
        }
    }

    /// Source with holes: `None` slots yield no row.
    struct GappySource {
        slots: Vec<Option<Row>>,
        cursor: usize,
    }

    impl RowSource for GappySource {
        fn len(&self) -> usize {
            self.slots.len()
        }

        fn reset(&mut self) {
            self.cursor = 0;
        }

        fn next_row(&mut self) -> Option<Row> {
            let slot = self.slots.get(self.cursor)?.clone();
            self.cursor += 1;
            slot
        }
    }

    fn pair_rows(n: i64) -> RowSet {
        (0..n)
            .map(|i| {
                Row::default()
                    .with_primary_key("key", format!("k{}", i))
                    .with_attribute("count", i)
            })
            .collect()
    }

    #[test]
    fn test_scan_one_reads_first_row() {
        let mut rows = pair_rows(3);
        rows.next_row();

        let mut pair = Pair::default();
        scan_one(&mut rows, &mut pair).unwrap();
        assert_eq!(
            pair,
            Pair {
                key: "k0".to_string(),
                count: 0,
            }
        );
    }

    #[test]
    fn test_scan_one_empty_source_is_noop() {
        let mut rows = RowSet::default();
        let mut pair = Pair {
            key: "untouched".to_string(),
            count: 9,
        };
        scan_one(&mut rows, &mut pair).unwrap();
        assert_eq!(pair.key, "untouched");
        assert_eq!(pair.count, 9);
    }

    #[test]
    fn test_scan_one_source_yields_nothing() {
        let mut source = ShortSource {
            inner: RowSet::default(),
            reported: 1,
        };
        let err = scan_one(&mut source, &mut Pair::default()).unwrap_err();
        assert_eq!(err, Error::EmptyRows);
    }

    #[test]
    fn test_scan_many_replaces_contents() {
        let mut rows = pair_rows(2);
        let mut pairs = vec![Pair {
            key: "stale".to_string(),
            count: -1,
        }];

        scan_many(&mut rows, &mut pairs).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].key, "k0");
        assert_eq!(pairs[1].count, 1);
    }

    #[test]
    fn test_scan_many_boxed_elements() {
        let mut rows = pair_rows(2);
        let mut pairs: Vec<Box<Pair>> = Vec::new();
        scan_many(&mut rows, &mut pairs).unwrap();
        assert_eq!(pairs[1].key, "k1");
    }

    #[test]
    fn test_scan_many_maps() {
        let mut rows = pair_rows(2);
        let mut maps: Vec<HashMap<String, Value>> = Vec::new();
        scan_many(&mut rows, &mut maps).unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0]["key"], Value::from("k0"));
        assert_eq!(maps[1]["count"], Value::Integer(1));
    }

    #[test]
    fn test_scan_many_short_read_skips_by_default() {
        let mut source = ShortSource {
            inner: pair_rows(2),
            reported: 4,
        };
        let mut pairs: Vec<Pair> = Vec::new();
        scan_many(&mut source, &mut pairs).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.capacity() >= 4);
    }

    #[test]
    fn test_scan_many_short_read_fails_when_configured() {
        let mut source = ShortSource {
            inner: pair_rows(1),
            reported: 3,
        };
        let scanner =
            Scanner::with_options(ScanOptions::new().with_short_read(ShortRead::Fail));
        let mut pairs: Vec<Pair> = Vec::new();

        let err = scanner.scan_many(&mut source, &mut pairs).unwrap_err();
        assert_eq!(err, Error::ShortRead { expected: 3, read: 1 });
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_scan_many_skips_missing_middle_slot() {
        let row = |key: &str| Row::default().with_primary_key("key", key);
        let mut source = GappySource {
            slots: vec![Some(row("a")), None, Some(row("c"))],
            cursor: 0,
        };
        let mut pairs: Vec<Pair> = Vec::new();

        scan_many(&mut source, &mut pairs).unwrap();
        let keys: Vec<&str> = pairs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);

        let scanner =
            Scanner::with_options(ScanOptions::new().with_short_read(ShortRead::Fail));
        let err = scanner.scan_many(&mut source, &mut pairs).unwrap_err();
        assert_eq!(err, Error::ShortRead { expected: 3, read: 2 });
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_scan_many_error_keeps_decoded_prefix() {
        let mut rows: RowSet = vec![
            Row::default().with_attribute("count", 1),
            Row::default().with_attribute("count", "two"),
            Row::default().with_attribute("count", 3),
        ]
        .into_iter()
        .collect();
        let mut pairs: Vec<Pair> = Vec::new();

        let err = scan_many(&mut rows, &mut pairs).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].count, 1);
    }

    #[test]
    fn test_unmarshal_dispatches_on_shape() {
        let mut rows = pair_rows(3);

        let mut one = Pair::default();
        unmarshal(&mut rows, &mut one).unwrap();
        assert_eq!(one.key, "k0");

        let mut many: Vec<Pair> = Vec::new();
        unmarshal(&mut rows, &mut many).unwrap();
        assert_eq!(many.len(), 3);

        let mut map: HashMap<String, Value> = HashMap::new();
        unmarshal(&mut rows, &mut map).unwrap();
        assert_eq!(map.len(), 2);

        let mut boxed: Box<Vec<Pair>> = Box::default();
        unmarshal(&mut rows, &mut boxed).unwrap();
        assert_eq!(boxed.len(), 3);
        assert_eq!(boxed[2].key, "k2");
    }

    #[test]
    fn test_scanner_caches_field_maps() {
        let scanner = Scanner::new();
        let mut pairs: Vec<Pair> = Vec::new();
        scanner.scan_many(&mut pair_rows(1), &mut pairs).unwrap();
        scanner.scan_many(&mut pair_rows(2), &mut pairs).unwrap();
        assert_eq!(scanner.cache().len(), 1);

        let uncached =
            Scanner::with_options(ScanOptions::new().with_field_map_cache(false));
        uncached.scan_many(&mut pair_rows(1), &mut pairs).unwrap();
        assert!(uncached.cache().is_empty());
    }
}
