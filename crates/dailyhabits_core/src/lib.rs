//! Core domain logic for DailyHabits.
//! This crate is the single source of truth for habit and streak invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::habit::{Habit, HabitId};
pub use model::streak::compute_streak;
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::habit_service::{
    ActionOutcome, Capabilities, HabitAction, HabitService, HabitServiceError, HabitView,
    LoadStatus, PopupView, ServiceResult,
};
pub use store::memory_kv::MemoryKvStore;
pub use store::sqlite_kv::SqliteKvStore;
pub use store::{KvSnapshot, KvStore, StoreError, StoreResult, DARK_MODE_KEY, HABITS_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
