//! Domain model for tracked habits.
//!
//! # Responsibility
//! - Define the persisted habit record and its identity type.
//! - Own the streak algorithm every mutation recomputes from.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - `Habit::streak` is derived data; callers never set it directly.
//! - Transient UI state (edit flags, draft text) is not part of the model.

pub mod habit;
pub mod streak;
