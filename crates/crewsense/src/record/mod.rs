//! Declarative fixed-width record decoding.
//!
//! A [`RecordSchema`] is plain data (it ships inside the offset table), so a
//! game update that reorders or resizes fields only needs a new table.

mod schema;
mod value;

pub use schema::*;
pub use value::*;
