//! Worksheet template types for sheetsql.
//!
//! This crate holds the pieces shared by validation and script generation:
//! the SQL type vocabulary, spreadsheet cell addressing, raw worksheet grids
//! and the typed five-row template header.

mod coord;
pub use coord::*;

mod grid;
pub use grid::*;

mod layout;
pub use layout::*;

mod types;
pub use types::*;
