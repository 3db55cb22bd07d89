pub mod resolver;
pub mod rules;

pub use resolver::{normalize_header, suggest, validate, ValidatedMapping};
pub use rules::suggest_tag;
