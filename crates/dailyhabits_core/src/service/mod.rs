//! Core use-case services.
//!
//! # Responsibility
//! - Hold popup session state and apply user actions to it.
//! - Keep host/FFI layers decoupled from storage details.

pub mod clock;
pub mod habit_service;
