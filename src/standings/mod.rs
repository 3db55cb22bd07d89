pub mod aggregator;
pub mod recalculation;

pub use aggregator::{apply, get_standings, EventResults, EventScore};
pub use recalculation::{rebuild, RebuildSummary};
