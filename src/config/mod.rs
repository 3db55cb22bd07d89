pub mod settings;

pub use settings::{AppConfig, PointsSettings, WizardSettings};

/// Database location, overridable for tests and deployments.
pub fn database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| "skate_league_ranking.db".to_string())
}
