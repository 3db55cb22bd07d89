pub mod detector;
pub mod rows;
pub mod table;

pub use detector::{detect, DEFAULT_DISCIPLINE};
pub use rows::parse;
pub use table::read_table;
