//! Data model for tabular data representation

mod table;

pub use table::{Row, Table};
