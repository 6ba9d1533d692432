pub mod color;
pub mod series_table;

pub use color::*;
pub use series_table::*;
