//! Column model for decoded rows.

mod column;
mod row;
mod value;

pub use column::Column;
pub use row::Row;
pub use value::Value;
