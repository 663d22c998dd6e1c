//! Row sources consumed by the scan entry points.
//!
//! The `RowSource` trait is the only contract the decoder needs from whatever
//! produced the rows. `RowSet` is a materialized, re-iterable implementation.

use crate::types::Row;
use futures::{TryStream, TryStreamExt};

/// Iteration contract over a materialized set of rows.
///
/// `len` must stay stable across `reset`, `reset` must be idempotent, and
/// `next_row` must be safe to call `len` times after a reset. A `None` from
/// `next_row` means no row is available for that slot.
///
/// # Example
///
/// ```
/// use rowscan::{Row, RowSet, RowSource};
///
/// let mut rows: RowSet = vec![Row::default().with_attribute("name", "yuzj")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(rows.len(), 1);
/// rows.reset();
/// assert!(rows.next_row().is_some());
/// assert!(rows.next_row().is_none());
/// ```
pub trait RowSource {
    /// Total number of rows available in one iteration pass.
    fn len(&self) -> usize;

    /// Check if the source has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewind iteration to the first row.
    fn reset(&mut self);

    /// Get the next row, or `None` when no row is available.
    fn next_row(&mut self) -> Option<Row>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn next_row(&mut self) -> Option<Row> {
        (**self).next_row()
    }
}

/// In-memory row source with a rewindable cursor.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    /// Buffered rows.
    rows: Vec<Row>,
    /// Current position in the buffer.
    cursor: usize,
}

impl RowSet {
    /// Create a row set from buffered rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows, cursor: 0 }
    }

    /// Collect a fallible stream of rows into a row set.
    ///
    /// Paged readers hand out rows asynchronously; decoding needs them
    /// materialized, so the whole stream is drained first. The first stream
    /// error is returned as is.
    ///
    /// # Example
    ///
    /// ```
    /// use futures::stream;
    /// use rowscan::{Row, RowSet, RowSource};
    ///
    /// # tokio_test::block_on(async {
    /// let rows = stream::iter(vec![Ok::<_, std::io::Error>(Row::default())]);
    /// let set = RowSet::from_stream(rows).await.unwrap();
    /// assert_eq!(set.len(), 1);
    /// # });
    /// ```
    pub async fn from_stream<S>(stream: S) -> std::result::Result<Self, S::Error>
    where
        S: TryStream<Ok = Row>,
    {
        let rows: Vec<Row> = stream.try_collect().await?;
        Ok(Self::new(rows))
    }

    /// Get the buffered rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of rows not yet returned by `next_row`.
    pub fn remaining(&self) -> usize {
        self.rows.len().saturating_sub(self.cursor)
    }

    /// Take the buffered rows, leaving the set empty.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl RowSource for RowSet {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }

    fn next_row(&mut self) -> Option<Row> {
        let row = self.rows.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(row)
    }
}

impl From<Vec<Row>> for RowSet {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Row> for RowSet {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
