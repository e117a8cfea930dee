//! Habit domain model.
//!
//! # Responsibility
//! - Define the persisted habit record and its wire shape.
//! - Provide the same-day completion toggle and streak refresh.
//!
//! # Invariants
//! - `id` is stable and never reused for another habit.
//! - `completions` holds each calendar date at most once.
//! - `streak` equals `compute_streak(completions, day)` for the day of the
//!   most recent mutation.

use crate::model::streak::compute_streak;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque habit identifier.
///
/// New ids are UUID v4 text, but persisted ids are kept verbatim so records
/// written by other hosts (for example `"1"`) still resolve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Allocates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for HabitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HabitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for HabitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One tracked behavior.
///
/// Serialized with exactly the four fields stored under the `habits` key.
/// Unknown fields in stored records are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    /// Display label. Not trimmed or validated after creation.
    pub name: String,
    /// Dates the habit was marked done, serialized as `YYYY-MM-DD`.
    #[serde(default)]
    pub completions: BTreeSet<NaiveDate>,
    /// Derived; see [`Habit::refresh_streak`].
    #[serde(default)]
    pub streak: u32,
}

impl Habit {
    /// Creates a habit with a generated id, no completions and streak 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(HabitId::generate(), name)
    }

    /// Creates a habit with a caller-provided id.
    pub fn with_id(id: HabitId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completions: BTreeSet::new(),
            streak: 0,
        }
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completions.contains(&day)
    }

    /// Flips completion for `today` and recomputes the streak.
    ///
    /// Returns whether `today` is completed after the call. Two calls with
    /// the same `today` restore the previous state.
    pub fn toggle_completion(&mut self, today: NaiveDate) -> bool {
        let completed = if self.completions.remove(&today) {
            false
        } else {
            self.completions.insert(today);
            true
        };
        self.refresh_streak(today);
        completed
    }

    /// Recomputes `streak` as of `today`.
    pub fn refresh_streak(&mut self, today: NaiveDate) {
        self.streak = compute_streak(&self.completions, today);
    }
}

#[cfg(test)]
mod tests {
    use super::{Habit, HabitId};
    use chrono::NaiveDate;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(HabitId::generate(), HabitId::generate());
    }

    #[test]
    fn toggle_twice_restores_completions_and_streak() {
        let mut habit = Habit::with_id(HabitId::from("h1"), "Read");
        habit.completions.insert(day("2024-05-09"));
        habit.refresh_streak(day("2024-05-10"));
        let before = habit.clone();

        assert!(habit.toggle_completion(day("2024-05-10")));
        assert_eq!(habit.streak, 2);
        assert!(!habit.toggle_completion(day("2024-05-10")));
        assert_eq!(habit, before);
    }
}
