//! Row decoders and destination shapes.
//!
//! Each destination type picks its decoder once per scan through `Target`:
//!
//! | Destination | Decoder |
//! |-------------|---------|
//! | `#[derive(Record)]` struct | `StructDecoder` |
//! | `HashMap<String, Value>` / `BTreeMap<String, Value>` | `MapDecoder` |
//! | `Box<T>` | `Boxed` around `T`'s decoder |

mod field;
mod from_value;
mod map;
mod structs;

pub use field::{FieldMap, FieldMapCache, Record};
pub use from_value::FromValue;
pub use map::{MapDecoder, MapTarget};
pub use structs::StructDecoder;

use crate::error::Result;
use crate::types::Column;

/// Places one row's columns into a destination.
pub trait Decoder<T: ?Sized> {
    /// Decode primary keys first, then attributes, into `dest`.
    fn decode(
        &self,
        primary_keys: Vec<Column>,
        attributes: Vec<Column>,
        dest: &mut T,
    ) -> Result<()>;
}

/// A destination type a row can be decoded into.
///
/// Implemented for map types here and for structs by `#[derive(Record)]`.
/// A hand-written `Record` pairs with:
///
/// ```
/// use rowscan::{FieldMap, FieldMapCache, Record, StructDecoder, Target};
///
/// #[derive(Default)]
/// struct Point {
///     x: i64,
/// }
///
/// impl Record for Point {
///     fn resolve(fields: &mut FieldMap<Self>) {
///         fields.field("x", |p: &mut Self| &mut p.x);
///     }
/// }
///
/// impl Target for Point {
///     type Decoder = StructDecoder<Self>;
///
///     fn decoder(cache: &FieldMapCache) -> Self::Decoder {
///         StructDecoder::from_cache(cache)
///     }
///
///     fn blank() -> Self {
///         Self::default()
///     }
/// }
/// ```
pub trait Target: Sized {
    /// Decoder used for this destination type.
    type Decoder: Decoder<Self>;

    /// Build the decoder, resolving through `cache` where needed.
    fn decoder(cache: &FieldMapCache) -> Self::Decoder;

    /// Create a fresh, empty destination for one row.
    fn blank() -> Self;
}

/// Decoder for a boxed destination, delegating to the inner decoder.
#[derive(Debug, Clone)]
pub struct Boxed<D>(pub D);

impl<T, D: Decoder<T>> Decoder<Box<T>> for Boxed<D> {
    fn decode(
        &self,
        primary_keys: Vec<Column>,
        attributes: Vec<Column>,
        dest: &mut Box<T>,
    ) -> Result<()> {
        self.0.decode(primary_keys, attributes, dest)
    }
}

impl<T: Target> Target for Box<T> {
    type Decoder = Boxed<T::Decoder>;

    fn decoder(cache: &FieldMapCache) -> Self::Decoder {
        Boxed(T::decoder(cache))
    }

    fn blank() -> Self {
        Box::new(T::blank())
    }
}
