//! Habit store use-case service.
//!
//! # Responsibility
//! - Own the ordered habit collection and transient popup state.
//! - Route every mutation through one update path (`apply`).
//! - Mirror mutations to the attached key-value store.
//!
//! # Invariants
//! - Writes are fire-and-forget: a failed `set` is logged and the in-memory
//!   state is kept.
//! - Without an attached store every mutation is memory-only.
//! - After a failed load the store is never written for the rest of the
//!   session, so unreadable data is left as it was.
//! - Edit flags live beside the collection, never inside `Habit`.
//! - Habit names are never written to logs.

use crate::model::habit::{Habit, HabitId};
use crate::service::clock::{Clock, SystemClock};
use crate::store::{KvSnapshot, KvStore, StoreError, StoreResult, DARK_MODE_KEY, HABITS_KEY};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for actions the service cannot apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitServiceError {
    /// No habit with this id exists in memory.
    HabitNotFound(HabitId),
    /// The action needs an optional feature this host variant turned off.
    CapabilityDisabled(&'static str),
}

impl Display for HabitServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HabitNotFound(id) => write!(f, "habit not found: {id}"),
            Self::CapabilityDisabled(name) => write!(f, "capability disabled: {name}"),
        }
    }
}

impl Error for HabitServiceError {}

pub type ServiceResult<T> = Result<T, HabitServiceError>;

/// Optional features exposed by a host variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Rename and edit-mode toggling.
    pub edit_in_place: bool,
    /// Theme toggle persisted under `darkMode`.
    pub dark_mode: bool,
}

impl Capabilities {
    /// Variant without edit-in-place or theme toggle.
    pub fn minimal() -> Self {
        Self {
            edit_in_place: false,
            dark_mode: false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            edit_in_place: true,
            dark_mode: true,
        }
    }
}

/// Every state change the popup can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HabitAction {
    /// New-habit text field changed.
    SetDraft(String),
    /// New-habit form submitted with the current draft.
    SubmitDraft,
    Create {
        name: String,
    },
    ToggleCompletion {
        id: HabitId,
        today: NaiveDate,
    },
    /// Per-keystroke name change.
    Rename {
        id: HabitId,
        name: String,
    },
    BeginEdit(HabitId),
    /// Name field lost focus.
    EndEdit(HabitId),
    ToggleEdit(HabitId),
    Delete(HabitId),
    ToggleDarkMode,
}

impl HabitAction {
    fn label(&self) -> &'static str {
        match self {
            Self::SetDraft(_) => "set_draft",
            Self::SubmitDraft => "submit_draft",
            Self::Create { .. } => "create",
            Self::ToggleCompletion { .. } => "toggle_completion",
            Self::Rename { .. } => "rename",
            Self::BeginEdit(_) => "begin_edit",
            Self::EndEdit(_) => "end_edit",
            Self::ToggleEdit(_) => "toggle_edit",
            Self::Delete(_) => "delete",
            Self::ToggleDarkMode => "toggle_dark_mode",
        }
    }
}

/// What an applied action changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing changed (blank habit name).
    Unchanged,
    DraftUpdated,
    Created(HabitId),
    Completion {
        id: HabitId,
        completed: bool,
        streak: u32,
    },
    Renamed(HabitId),
    Editing {
        id: HabitId,
        editing: bool,
    },
    Deleted(Habit),
    DarkMode(bool),
}

/// Result of the startup read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// State came from the store (possibly empty).
    Loaded { habits: usize },
    /// No usable store; the session runs from an empty state.
    Unavailable,
}

/// Render-ready view of one habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitView {
    pub id: HabitId,
    pub name: String,
    pub streak: u32,
    pub completed_today: bool,
    pub editing: bool,
}

/// Render-ready view of the whole popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub habits: Vec<HabitView>,
    pub draft: String,
    pub dark_mode: bool,
    pub capabilities: Capabilities,
}

/// State container for one popup session.
pub struct HabitService<S: KvStore> {
    store: Option<S>,
    /// Set when the last load could not read the store.
    write_suspended: bool,
    clock: Box<dyn Clock + Send>,
    capabilities: Capabilities,
    habits: Vec<Habit>,
    editing: BTreeSet<HabitId>,
    draft: String,
    dark_mode: bool,
}

impl<S: KvStore> HabitService<S> {
    /// Creates a service writing through to `store`.
    pub fn new(store: S) -> Self {
        Self::from_parts(Some(store))
    }

    /// Creates a service with no external store; all state is session-only.
    pub fn memory_only() -> Self {
        Self::from_parts(None)
    }

    fn from_parts(store: Option<S>) -> Self {
        Self {
            store,
            write_suspended: false,
            clock: Box::new(SystemClock),
            capabilities: Capabilities::default(),
            habits: Vec::new(),
            editing: BTreeSet::new(),
            draft: String::new(),
            dark_mode: false,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Whether mutations are currently written through to the store.
    pub fn is_persistent(&self) -> bool {
        self.store.is_some() && !self.write_suspended
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Replaces in-memory state with what the store holds.
    ///
    /// Never fails: an absent or broken store leaves the session empty and
    /// logs a warning. A store that cannot be read is not written again until
    /// the next successful load.
    pub fn load(&mut self) -> LoadStatus {
        self.habits.clear();
        self.editing.clear();
        self.dark_mode = false;
        self.write_suspended = false;

        let Some(store) = self.store.as_ref() else {
            warn!("event=habits_load module=service status=degraded reason=store_unavailable");
            return LoadStatus::Unavailable;
        };

        let keys: &[&str] = if self.capabilities.dark_mode {
            &[HABITS_KEY, DARK_MODE_KEY]
        } else {
            &[HABITS_KEY]
        };

        match store.get(keys).and_then(|snapshot| decode_state(&snapshot)) {
            Ok((habits, dark_mode)) => {
                self.habits = habits;
                self.dark_mode = dark_mode && self.capabilities.dark_mode;
                info!(
                    "event=habits_load module=service status=ok habits={} dark_mode={}",
                    self.habits.len(),
                    self.dark_mode
                );
                LoadStatus::Loaded {
                    habits: self.habits.len(),
                }
            }
            Err(err) => {
                warn!(
                    "event=habits_load module=service status=degraded reason=store_read_failed error={err}"
                );
                self.write_suspended = true;
                LoadStatus::Unavailable
            }
        }
    }

    /// Applies one action. This is the only path that mutates state.
    pub fn apply(&mut self, action: HabitAction) -> ServiceResult<ActionOutcome> {
        let label = action.label();
        let result = match action {
            HabitAction::SetDraft(text) => {
                self.draft = text;
                Ok(ActionOutcome::DraftUpdated)
            }
            HabitAction::SubmitDraft => {
                let outcome = self.create(self.draft.clone());
                if matches!(outcome, ActionOutcome::Created(_)) {
                    self.draft.clear();
                }
                Ok(outcome)
            }
            HabitAction::Create { name } => Ok(self.create(name)),
            HabitAction::ToggleCompletion { id, today } => self.toggle_completion_on(id, today),
            HabitAction::Rename { id, name } => self.rename(id, name),
            HabitAction::BeginEdit(id) => self.set_editing(id, true),
            HabitAction::EndEdit(id) => self.set_editing(id, false),
            HabitAction::ToggleEdit(id) => {
                let editing = !self.editing.contains(&id);
                self.set_editing(id, editing)
            }
            HabitAction::Delete(id) => self.delete(id),
            HabitAction::ToggleDarkMode => self.flip_dark_mode(),
        };

        match &result {
            Ok(ActionOutcome::Unchanged) => {
                debug!("event=habit_action module=service action={label} status=noop")
            }
            Ok(_) => debug!("event=habit_action module=service action={label} status=ok"),
            Err(err) => {
                debug!("event=habit_action module=service action={label} status=rejected error={err}")
            }
        }
        result
    }

    /// Adds a habit named `name` (trimmed). Blank names are ignored.
    pub fn create_habit(&mut self, name: impl Into<String>) -> Option<HabitId> {
        match self.apply(HabitAction::Create { name: name.into() }) {
            Ok(ActionOutcome::Created(id)) => Some(id),
            _ => None,
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) -> ServiceResult<()> {
        self.apply(HabitAction::SetDraft(text.into())).map(|_| ())
    }

    /// Creates a habit from the draft; clears the draft on success.
    pub fn submit_draft(&mut self) -> Option<HabitId> {
        match self.apply(HabitAction::SubmitDraft) {
            Ok(ActionOutcome::Created(id)) => Some(id),
            _ => None,
        }
    }

    /// Toggles completion on `today`; returns whether it is now completed.
    pub fn toggle_completion(&mut self, id: &HabitId, today: NaiveDate) -> ServiceResult<bool> {
        let outcome = self.apply(HabitAction::ToggleCompletion {
            id: id.clone(),
            today,
        })?;
        Ok(matches!(
            outcome,
            ActionOutcome::Completion {
                completed: true,
                ..
            }
        ))
    }

    /// Toggles completion on the clock's current day.
    pub fn toggle_completion_today(&mut self, id: &HabitId) -> ServiceResult<bool> {
        let today = self.today();
        self.toggle_completion(id, today)
    }

    pub fn rename_habit(&mut self, id: &HabitId, name: impl Into<String>) -> ServiceResult<()> {
        self.apply(HabitAction::Rename {
            id: id.clone(),
            name: name.into(),
        })
        .map(|_| ())
    }

    /// Flips the edit flag; returns whether the habit is now being edited.
    pub fn toggle_edit(&mut self, id: &HabitId) -> ServiceResult<bool> {
        let outcome = self.apply(HabitAction::ToggleEdit(id.clone()))?;
        Ok(matches!(outcome, ActionOutcome::Editing { editing: true, .. }))
    }

    pub fn begin_edit(&mut self, id: &HabitId) -> ServiceResult<()> {
        self.apply(HabitAction::BeginEdit(id.clone())).map(|_| ())
    }

    pub fn end_edit(&mut self, id: &HabitId) -> ServiceResult<()> {
        self.apply(HabitAction::EndEdit(id.clone())).map(|_| ())
    }

    pub fn delete_habit(&mut self, id: &HabitId) -> ServiceResult<()> {
        self.apply(HabitAction::Delete(id.clone())).map(|_| ())
    }

    /// Flips the theme flag; returns the new value.
    pub fn toggle_dark_mode(&mut self) -> ServiceResult<bool> {
        let outcome = self.apply(HabitAction::ToggleDarkMode)?;
        Ok(matches!(outcome, ActionOutcome::DarkMode(true)))
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| &habit.id == id)
    }

    pub fn is_editing(&self, id: &HabitId) -> bool {
        self.editing.contains(id)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Builds the render view as of `today`.
    pub fn snapshot(&self, today: NaiveDate) -> PopupView {
        PopupView {
            habits: self
                .habits
                .iter()
                .map(|habit| HabitView {
                    id: habit.id.clone(),
                    name: habit.name.clone(),
                    streak: habit.streak,
                    completed_today: habit.is_completed_on(today),
                    editing: self.editing.contains(&habit.id),
                })
                .collect(),
            draft: self.draft.clone(),
            dark_mode: self.dark_mode,
            capabilities: self.capabilities,
        }
    }

    pub fn snapshot_now(&self) -> PopupView {
        self.snapshot(self.today())
    }

    fn create(&mut self, name: String) -> ActionOutcome {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return ActionOutcome::Unchanged;
        }

        let habit = Habit::new(trimmed);
        let id = habit.id.clone();
        self.habits.push(habit);
        self.persist_habits();
        ActionOutcome::Created(id)
    }

    fn toggle_completion_on(
        &mut self,
        id: HabitId,
        today: NaiveDate,
    ) -> ServiceResult<ActionOutcome> {
        let habit = self.find_mut(&id)?;
        let completed = habit.toggle_completion(today);
        let streak = habit.streak;
        self.persist_habits();
        Ok(ActionOutcome::Completion {
            id,
            completed,
            streak,
        })
    }

    fn rename(&mut self, id: HabitId, name: String) -> ServiceResult<ActionOutcome> {
        self.require(self.capabilities.edit_in_place, "edit_in_place")?;
        self.find_mut(&id)?.name = name;
        // Inside an edit session the write waits for `EndEdit`.
        if !self.editing.contains(&id) {
            self.persist_habits();
        }
        Ok(ActionOutcome::Renamed(id))
    }

    fn set_editing(&mut self, id: HabitId, editing: bool) -> ServiceResult<ActionOutcome> {
        self.require(self.capabilities.edit_in_place, "edit_in_place")?;
        self.find_mut(&id)?;

        if editing {
            self.editing.insert(id.clone());
        } else if self.editing.remove(&id) {
            self.persist_habits();
        }
        Ok(ActionOutcome::Editing { id, editing })
    }

    fn delete(&mut self, id: HabitId) -> ServiceResult<ActionOutcome> {
        let index = self
            .habits
            .iter()
            .position(|habit| habit.id == id)
            .ok_or_else(|| HabitServiceError::HabitNotFound(id.clone()))?;

        let removed = self.habits.remove(index);
        self.editing.remove(&id);
        self.persist_habits();
        Ok(ActionOutcome::Deleted(removed))
    }

    fn flip_dark_mode(&mut self) -> ServiceResult<ActionOutcome> {
        self.require(self.capabilities.dark_mode, "dark_mode")?;
        self.dark_mode = !self.dark_mode;
        self.write_through(DARK_MODE_KEY, Value::Bool(self.dark_mode));
        Ok(ActionOutcome::DarkMode(self.dark_mode))
    }

    fn require(&self, enabled: bool, name: &'static str) -> ServiceResult<()> {
        if enabled {
            Ok(())
        } else {
            Err(HabitServiceError::CapabilityDisabled(name))
        }
    }

    fn find_mut(&mut self, id: &HabitId) -> ServiceResult<&mut Habit> {
        self.habits
            .iter_mut()
            .find(|habit| &habit.id == id)
            .ok_or_else(|| HabitServiceError::HabitNotFound(id.clone()))
    }

    fn persist_habits(&self) {
        match serde_json::to_value(&self.habits) {
            Ok(value) => self.write_through(HABITS_KEY, value),
            Err(err) => warn!(
                "event=store_write module=service status=error key={HABITS_KEY} error_code=encode_failed error={err}"
            ),
        }
    }

    fn write_through(&self, key: &'static str, value: Value) {
        let Some(store) = self.store.as_ref().filter(|_| !self.write_suspended) else {
            return;
        };

        let mut entries = KvSnapshot::new();
        entries.insert(key.to_string(), value);
        if let Err(err) = store.set(entries) {
            warn!(
                "event=store_write module=service status=error key={key} error_code=set_failed error={err}"
            );
        }
    }
}

fn decode_state(snapshot: &KvSnapshot) -> StoreResult<(Vec<Habit>, bool)> {
    let habits = match snapshot.get(HABITS_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|source| StoreError::Decode {
                key: HABITS_KEY.to_string(),
                source,
            })?
        }
    };
    let dark_mode = snapshot
        .get(DARK_MODE_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok((habits, dark_mode))
}
