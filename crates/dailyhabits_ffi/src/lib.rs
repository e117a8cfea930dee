//! Host-facing bindings for the DailyHabits popup.
//!
//! Dart bindings are generated from `api` by flutter_rust_bridge codegen.

pub mod api;
