use std::collections::HashMap;

/// Points assignment knobs. An explicit override (position -> points) wins
/// over the built-in table and decay formula.
#[derive(Debug, Clone, Default)]
pub struct PointsSettings {
    pub overrides: HashMap<u32, i64>,
}

/// Upload wizard and aggregation-lock knobs.
#[derive(Debug, Clone)]
pub struct WizardSettings {
    /// Lifetime of a wizard session; expiry cancels the upload.
    pub session_ttl_minutes: i64,
    /// League lock acquisition attempts before surfacing a conflict.
    pub lock_retries: u32,
    /// Delay between lock attempts.
    pub lock_retry_delay_ms: u64,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            session_ttl_minutes: 30,
            lock_retries: 5,
            lock_retry_delay_ms: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub points: PointsSettings,
    pub wizard: WizardSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            points: PointsSettings::default(),
            wizard: WizardSettings::default(),
        }
    }
}
