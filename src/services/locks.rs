use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use log::debug;

use crate::errors::EngineError;

/// Exclusive per-league locks serializing the two standings-mutating paths
/// (upload commit and rebuild). Uploads for different leagues run in parallel.
#[derive(Debug, Default)]
pub struct LeagueLocks {
    busy: Mutex<HashSet<i64>>,
}

#[derive(Debug)]
pub struct LeagueLockGuard<'a> {
    locks: &'a LeagueLocks,
    league_id: i64,
}

impl LeagueLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to take the league lock, retrying with a fixed backoff. Exhausting
    /// the budget surfaces a transient `AggregationConflict`.
    pub fn acquire(
        &self,
        league_id: i64,
        retries: u32,
        retry_delay: Duration,
    ) -> Result<LeagueLockGuard<'_>, EngineError> {
        for attempt in 0..=retries {
            if self.try_mark_busy(league_id) {
                return Ok(LeagueLockGuard {
                    locks: self,
                    league_id,
                });
            }
            debug!("League {league_id} busy, lock attempt {}", attempt + 1);
            std::thread::sleep(retry_delay);
        }

        Err(EngineError::AggregationConflict { league_id })
    }

    fn try_mark_busy(&self, league_id: i64) -> bool {
        self.busy
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(league_id)
    }

    fn release(&self, league_id: i64) {
        self.busy
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&league_id);
    }
}

impl Drop for LeagueLockGuard<'_> {
    fn drop(&mut self) {
        self.locks.release(self.league_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_conflicts_until_guard_drops() {
        let locks = LeagueLocks::new();
        let guard = locks
            .acquire(1, 0, Duration::from_millis(1))
            .expect("first acquire");

        let err = locks
            .acquire(1, 1, Duration::from_millis(1))
            .expect_err("should conflict");
        assert!(matches!(err, EngineError::AggregationConflict { league_id: 1 }));

        drop(guard);
        locks
            .acquire(1, 0, Duration::from_millis(1))
            .expect("acquire after release");
    }

    #[test]
    fn different_leagues_do_not_contend() {
        let locks = LeagueLocks::new();
        let _a = locks.acquire(1, 0, Duration::from_millis(1)).expect("league 1");
        let _b = locks.acquire(2, 0, Duration::from_millis(1)).expect("league 2");
    }
}
