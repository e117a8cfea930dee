//! FFI use-case API for the popup host.
//!
//! # Responsibility
//! - Expose popup actions to the host UI via FRB.
//! - Own one habit session per `HabitPopup` handle held by the host.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every action response carries the post-action snapshot, so the host can
//!   re-render without a second call.
//! - A store that cannot be opened degrades the session to memory-only.

use dailyhabits_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Capabilities, HabitId, HabitService, HabitServiceError, LoadStatus, PopupView,
    SqliteKvStore,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

const POPUP_DB_FILE_NAME: &str = "dailyhabits.sqlite3";
const POPUP_DB_PATH_ENV: &str = "DAILYHABITS_DB_PATH";

type PopupSession = HabitService<SqliteKvStore>;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Which optional popup features the host renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupVariant {
    /// Edit-in-place and theme toggle.
    Full,
    /// Completion toggle, add and delete only.
    Minimal,
}

impl PopupVariant {
    fn capabilities(self) -> Capabilities {
        match self {
            Self::Full => Capabilities::default(),
            Self::Minimal => Capabilities::minimal(),
        }
    }
}

/// One rendered habit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitItem {
    pub habit_id: String,
    pub name: String,
    pub streak: u32,
    pub completed_today: bool,
    pub editing: bool,
}

/// Everything the popup needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupSnapshot {
    pub items: Vec<HabitItem>,
    /// Pending new-habit text.
    pub draft: String,
    pub dark_mode: bool,
    pub edit_in_place_enabled: bool,
    pub dark_mode_enabled: bool,
    /// `false` when the session runs without a backing store.
    pub persistent: bool,
}

/// Action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupActionResponse {
    /// Whether the action was applied.
    pub ok: bool,
    /// Habit the action touched or created.
    pub habit_id: Option<String>,
    /// Human-readable message for diagnostics.
    pub message: String,
    pub snapshot: PopupSnapshot,
}

/// Host-owned popup session.
#[flutter_rust_bridge::frb(opaque)]
pub struct HabitPopup {
    session: Mutex<PopupSession>,
}

impl HabitPopup {
    /// Opens a session backed by SQLite at `db_path`.
    ///
    /// Falls back to `DAILYHABITS_DB_PATH`, then to a file in the temp dir.
    /// An unopenable store yields a memory-only session.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open(db_path: Option<String>, variant: PopupVariant) -> HabitPopup {
        let path = resolve_db_path(db_path);
        let session = match SqliteKvStore::open(&path) {
            Ok(store) => HabitService::new(store),
            Err(err) => {
                warn!(
                    "event=popup_open module=ffi status=degraded reason=store_open_failed error={err}"
                );
                HabitService::memory_only()
            }
        };
        Self::from_session(session.with_capabilities(variant.capabilities()))
    }

    /// Opens a session without any backing store.
    #[flutter_rust_bridge::frb(sync)]
    pub fn open_memory_only(variant: PopupVariant) -> HabitPopup {
        Self::from_session(PopupSession::memory_only().with_capabilities(variant.capabilities()))
    }

    fn from_session(session: PopupSession) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    /// Reads persisted state. Runs off the UI thread.
    pub fn load(&self) -> PopupActionResponse {
        let mut session = self.lock();
        let message = match session.load() {
            LoadStatus::Loaded { habits } => format!("Loaded {habits} habit(s)."),
            LoadStatus::Unavailable => "Storage unavailable; changes stay in memory.".to_string(),
        };
        respond(&session, Ok(None), message)
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn snapshot(&self) -> PopupSnapshot {
        to_snapshot(&self.lock())
    }

    /// Stores pending new-habit text (per keystroke).
    #[flutter_rust_bridge::frb(sync)]
    pub fn set_draft(&self, text: String) -> PopupSnapshot {
        let mut session = self.lock();
        if let Err(err) = session.set_draft(text) {
            warn!("event=popup_action module=ffi status=error action=set_draft error={err}");
        }
        to_snapshot(&session)
    }

    /// Submits the draft as a new habit.
    #[flutter_rust_bridge::frb(sync)]
    pub fn submit_draft(&self) -> PopupActionResponse {
        let mut session = self.lock();
        let created = session.submit_draft();
        created_response(&session, created)
    }

    /// Adds a habit directly from `name`.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_habit(&self, name: String) -> PopupActionResponse {
        let mut session = self.lock();
        let created = session.create_habit(name);
        created_response(&session, created)
    }

    /// Toggles completion for the current local day.
    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_today(&self, habit_id: String) -> PopupActionResponse {
        let mut session = self.lock();
        let id = HabitId::from(habit_id);
        let result = session.toggle_completion_today(&id).map(|completed| {
            if completed {
                "Marked complete."
            } else {
                "Marked incomplete."
            }
        });
        match result {
            Ok(message) => respond(&session, Ok(Some(id)), message),
            Err(err) => respond(&session, Err(err), ""),
        }
    }

    /// Replaces the habit name (per keystroke while editing).
    #[flutter_rust_bridge::frb(sync)]
    pub fn rename(&self, habit_id: String, name: String) -> PopupActionResponse {
        let mut session = self.lock();
        let id = HabitId::from(habit_id);
        let result = session.rename_habit(&id, name).map(|()| Some(id));
        respond(&session, result, "Renamed.")
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_edit(&self, habit_id: String) -> PopupActionResponse {
        let mut session = self.lock();
        let id = HabitId::from(habit_id);
        let result = session.toggle_edit(&id).map(|_| Some(id));
        respond(&session, result, "Edit mode toggled.")
    }

    /// Ends the edit session (name field lost focus) and persists the name.
    #[flutter_rust_bridge::frb(sync)]
    pub fn end_edit(&self, habit_id: String) -> PopupActionResponse {
        let mut session = self.lock();
        let id = HabitId::from(habit_id);
        let result = session.end_edit(&id).map(|()| Some(id));
        respond(&session, result, "Edit finished.")
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn delete(&self, habit_id: String) -> PopupActionResponse {
        let mut session = self.lock();
        let id = HabitId::from(habit_id);
        let result = session.delete_habit(&id).map(|()| Some(id));
        respond(&session, result, "Habit deleted.")
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_dark_mode(&self) -> PopupActionResponse {
        let mut session = self.lock();
        let result = session.toggle_dark_mode().map(|_| None);
        respond(&session, result, "Theme toggled.")
    }

    fn lock(&self) -> MutexGuard<'_, PopupSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn respond(
    session: &PopupSession,
    result: Result<Option<HabitId>, HabitServiceError>,
    message: impl Into<String>,
) -> PopupActionResponse {
    let snapshot = to_snapshot(session);
    match result {
        Ok(habit_id) => PopupActionResponse {
            ok: true,
            habit_id: habit_id.map(|id| id.to_string()),
            message: message.into(),
            snapshot,
        },
        Err(err) => PopupActionResponse {
            ok: false,
            habit_id: None,
            message: format!("popup action failed: {err}"),
            snapshot,
        },
    }
}

fn created_response(session: &PopupSession, created: Option<HabitId>) -> PopupActionResponse {
    match created {
        Some(id) => respond(session, Ok(Some(id)), "Habit added."),
        // Blank names are ignored rather than reported.
        None => respond(session, Ok(None), "Nothing to add."),
    }
}

fn to_snapshot(session: &PopupSession) -> PopupSnapshot {
    let PopupView {
        habits,
        draft,
        dark_mode,
        capabilities,
    } = session.snapshot_now();

    PopupSnapshot {
        items: habits
            .into_iter()
            .map(|habit| HabitItem {
                habit_id: habit.id.to_string(),
                name: habit.name,
                streak: habit.streak,
                completed_today: habit.completed_today,
                editing: habit.editing,
            })
            .collect(),
        draft,
        dark_mode,
        edit_in_place_enabled: capabilities.edit_in_place,
        dark_mode_enabled: capabilities.dark_mode,
        persistent: session.is_persistent(),
    }
}

fn resolve_db_path(explicit: Option<String>) -> PathBuf {
    let from_env = std::env::var(POPUP_DB_PATH_ENV).ok();
    [explicit, from_env]
        .into_iter()
        .flatten()
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(POPUP_DB_FILE_NAME))
}
