//! Row decoding for wide-column table stores.
//!
//! Rows from a table store arrive as primary-key columns plus attribute
//! columns. This crate places them into caller types: a struct bound to
//! column names with `#[derive(Record)]`, a `HashMap`/`BTreeMap` keyed by
//! column name, or a `Vec` of either.
//!
//! # Example
//!
//! ```
//! use rowscan::{Record, Row, RowSet};
//!
//! #[derive(Record, Default, Debug)]
//! struct People {
//!     #[column(name = "name")]
//!     name: String,
//!     #[column(name = "age")]
//!     age: i64,
//! }
//!
//! #[derive(Record, Default, Debug)]
//! struct Student {
//!     #[column(flatten)]
//!     people: People,
//!     #[column(name = "no")]
//!     no: String,
//! }
//!
//! let mut rows: RowSet = vec![Row::default()
//!     .with_attribute("name", "yuzj")
//!     .with_attribute("age", 28)
//!     .with_attribute("no", "1")]
//! .into_iter()
//! .collect();
//!
//! let mut student = Student::default();
//! rowscan::unmarshal(&mut rows, &mut student)?;
//!
//! assert_eq!(student.people.name, "yuzj");
//! assert_eq!(student.people.age, 28);
//! assert_eq!(student.no, "1");
//! # Ok::<(), rowscan::Error>(())
//! ```

pub mod decode;
pub mod error;
pub mod scan;
pub mod source;
pub mod types;

/// Target used by every `tracing` event of this crate.
pub(crate) const LOG_TARGET: &str = "rowscan";

// Re-export main types
pub use decode::{
    Boxed, Decoder, FieldMap, FieldMapCache, FromValue, MapDecoder, MapTarget, Record,
    StructDecoder, Target,
};
pub use error::{Error, Result};
pub use rowscan_derive::Record;
pub use scan::{scan_many, scan_one, unmarshal, ScanOptions, Scanner, ShortRead, Unmarshal};
pub use source::{RowSet, RowSource};
pub use types::{Column, Row, Value};
