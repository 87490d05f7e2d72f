//! Culvert headwall dimension lookup.
//!
//! Tables map a shape class and a size key (pipe diameter or span) to named
//! headwall dimensions. Tabulated sizes are returned exactly, sizes between
//! rows are interpolated linearly, and sizes outside the table are rejected.

pub mod culvert;
pub mod error;
pub mod io;
pub mod table;

pub use culvert::CulvertDesign;
pub use error::{LookupError, TableError};
pub use table::{
    DimensionRow, DimensionTable, HeadwallDimensionTable, LookupRequest, LookupResult,
    SIZE_TOLERANCE,
};
