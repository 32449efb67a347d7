//! Completion tracking and favorites on top of a key-value progress store.
//!
//! Values are JSON arrays. Per-day completion lives under `today_done_<dateKey>`;
//! the days whose whole selection was completed live under `completion_history`.

use crate::daily::DailySelection;
use crate::date::DateKey;
use crate::error::{EngineError, Result};
use crate::types::ContentKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

pub const COMPLETION_HISTORY_KEY: &str = "completion_history";
pub const TODAY_DONE_PREFIX: &str = "today_done_";

/// Key-value persistence supplied by the host application.
pub trait ProgressStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Store key holding the completed ids for a day.
pub fn today_done_key(date_key: DateKey) -> String {
    format!("{}{}", TODAY_DONE_PREFIX, date_key)
}

fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: ProgressStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
            EngineError::StorageUnavailable(format!("corrupt value at {}: {}", key, e))
        }),
        None => Ok(None),
    }
}

fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: ProgressStore + ?Sized,
{
    let raw = serde_json::to_string(value)
        .map_err(|e| EngineError::StorageUnavailable(format!("cannot encode {}: {}", key, e)))?;
    store.set(key, &raw)
}

/// Read the set of fully completed days.
pub fn load_history<S: ProgressStore + ?Sized>(store: &S) -> Result<BTreeSet<DateKey>> {
    Ok(read_json(store, COMPLETION_HISTORY_KEY)?.unwrap_or_default())
}

/// In-process store, used by tests and hosts without persistence.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| EngineError::StorageUnavailable("memory store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| EngineError::StorageUnavailable("memory store poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Completed vs. required items for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub completed: usize,
    pub required: usize,
    pub percent: u32,
}

/// Result of toggling an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// Whether the item is now marked done.
    pub done: bool,
    /// Whether this toggle appended the day to the completion history.
    pub day_logged: bool,
}

/// Done-set for one day plus the cross-day completion history.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionState {
    pub date_key: DateKey,
    required: Vec<String>,
    completed: Vec<String>,
    history: BTreeSet<DateKey>,
}

impl CompletionState {
    /// Load the state for the selection's day.
    ///
    /// A day whose stored done-set already covers the whole selection is logged to
    /// history here if it is missing.
    pub fn load<S: ProgressStore + ?Sized>(store: &S, selection: &DailySelection) -> Result<Self> {
        let date_key = selection.date_key;
        let completed: Vec<String> =
            read_json(store, &today_done_key(date_key))?.unwrap_or_default();
        let history = load_history(store)?;

        let mut state = Self {
            date_key,
            required: selection.item_ids(),
            completed,
            history,
        };
        state.log_day_if_complete(store)?;
        Ok(state)
    }

    /// Flip the done flag of an item in today's selection and persist it.
    pub fn toggle<S: ProgressStore + ?Sized>(&mut self, store: &S, id: &str) -> Result<ToggleOutcome> {
        if !self.required.iter().any(|r| r == id) {
            tracing::warn!(id, date_key = %self.date_key, "toggle for item outside today's selection");
            return Err(EngineError::UnknownItem(id.to_string()));
        }

        let done = if let Some(pos) = self.completed.iter().position(|c| c == id) {
            self.completed.remove(pos);
            false
        } else {
            self.completed.push(id.to_string());
            true
        };
        write_json(store, &today_done_key(self.date_key), &self.completed)?;

        let day_logged = self.log_day_if_complete(store)?;
        Ok(ToggleOutcome { done, day_logged })
    }

    /// Append today to history once; un-completing later never removes it.
    fn log_day_if_complete<S: ProgressStore + ?Sized>(&mut self, store: &S) -> Result<bool> {
        if !self.is_day_complete() || self.history.contains(&self.date_key) {
            return Ok(false);
        }
        self.history.insert(self.date_key);
        write_json(store, COMPLETION_HISTORY_KEY, &self.history)?;
        tracing::info!(date_key = %self.date_key, "daily study set completed");
        Ok(true)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|c| c == id)
    }

    pub fn completed_ids(&self) -> &[String] {
        &self.completed
    }

    pub fn history(&self) -> &BTreeSet<DateKey> {
        &self.history
    }

    pub fn is_day_complete(&self) -> bool {
        self.required.iter().all(|r| self.is_completed(r))
    }

    pub fn progress(&self) -> DayProgress {
        let completed = self
            .required
            .iter()
            .filter(|r| self.is_completed(r))
            .count();
        let required = self.required.len();
        let percent = if required == 0 {
            100
        } else {
            ((completed as f64 / required as f64) * 100.0).round() as u32
        };
        DayProgress {
            completed,
            required,
            percent,
        }
    }
}

/// Favorite ids for one content kind.
#[derive(Debug, Clone, Serialize)]
pub struct Favorites {
    pub kind: ContentKind,
    ids: Vec<String>,
}

impl Favorites {
    fn store_key(kind: ContentKind) -> String {
        format!("{}_favorites", kind.as_str())
    }

    pub fn load<S: ProgressStore + ?Sized>(store: &S, kind: ContentKind) -> Result<Self> {
        let ids = read_json(store, &Self::store_key(kind))?.unwrap_or_default();
        Ok(Self { kind, ids })
    }

    /// Add or remove `id`; returns whether it is now a favorite.
    pub fn toggle<S: ProgressStore + ?Sized>(&mut self, store: &S, id: &str) -> Result<bool> {
        let now_favorite = if let Some(pos) = self.ids.iter().position(|f| f == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        };
        write_json(store, &Self::store_key(self.kind), &self.ids)?;
        Ok(now_favorite)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|f| f == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentPool;
    use crate::daily::DailySelector;
    use pretty_assertions::assert_eq;

    struct FailingStore;

    impl ProgressStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(EngineError::StorageUnavailable("offline".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(EngineError::StorageUnavailable("offline".to_string()))
        }
    }

    fn selection(date: &str) -> DailySelection {
        let pool = ContentPool::builtin().unwrap();
        DailySelector::default()
            .select(&pool, DateKey::parse(date).unwrap())
            .unwrap()
    }

    #[test]
    fn new_day_starts_empty() {
        let store = MemoryProgressStore::new();
        let state = CompletionState::load(&store, &selection("2024-01-01")).unwrap();
        assert!(state.completed_ids().is_empty());
        assert!(state.history().is_empty());
        assert_eq!(
            state.progress(),
            DayProgress {
                completed: 0,
                required: 4,
                percent: 0
            }
        );
    }

    #[test]
    fn toggle_persists_done_ids() {
        let store = MemoryProgressStore::new();
        let sel = selection("2024-01-01");
        let mut state = CompletionState::load(&store, &sel).unwrap();

        let outcome = state.toggle(&store, "w4_3").unwrap();
        assert!(outcome.done);
        assert!(!outcome.day_logged);

        let raw = store.get("today_done_2024-01-01").unwrap().unwrap();
        assert_eq!(raw, r#"["w4_3"]"#);

        let reloaded = CompletionState::load(&store, &sel).unwrap();
        assert!(reloaded.is_completed("w4_3"));
        assert_eq!(reloaded.progress().percent, 25);
    }

    #[test]
    fn toggle_twice_undoes() {
        let store = MemoryProgressStore::new();
        let mut state = CompletionState::load(&store, &selection("2024-01-01")).unwrap();
        state.toggle(&store, "p3_5").unwrap();
        let outcome = state.toggle(&store, "p3_5").unwrap();
        assert!(!outcome.done);
        assert!(!state.is_completed("p3_5"));
    }

    #[test]
    fn completing_all_logs_day_once() {
        let store = MemoryProgressStore::new();
        let sel = selection("2024-01-01");
        let mut state = CompletionState::load(&store, &sel).unwrap();

        let mut logged = 0;
        for id in sel.item_ids() {
            if state.toggle(&store, &id).unwrap().day_logged {
                logged += 1;
            }
        }
        assert_eq!(logged, 1);
        assert!(state.is_day_complete());

        // Toggle off and on again repeatedly; the day stays logged exactly once.
        for _ in 0..3 {
            assert!(!state.toggle(&store, "w2_6").unwrap().day_logged);
            assert!(!state.toggle(&store, "w2_6").unwrap().day_logged);
        }
        let key = DateKey::parse("2024-01-01").unwrap();
        assert_eq!(state.history().iter().collect::<Vec<_>>(), vec![&key]);
        assert_eq!(
            store.get(COMPLETION_HISTORY_KEY).unwrap().unwrap(),
            r#"["2024-01-01"]"#
        );
    }

    #[test]
    fn uncompleting_keeps_history_entry() {
        let store = MemoryProgressStore::new();
        let sel = selection("2024-01-01");
        let mut state = CompletionState::load(&store, &sel).unwrap();
        for id in sel.item_ids() {
            state.toggle(&store, &id).unwrap();
        }
        state.toggle(&store, "w4_3").unwrap();
        assert!(!state.is_day_complete());
        assert!(state.history().contains(&sel.date_key));
    }

    #[test]
    fn load_reconciles_complete_day_missing_from_history() {
        let store = MemoryProgressStore::new();
        store
            .set(
                "today_done_2024-01-01",
                r#"["w4_3","w2_6","w4_7","p3_5"]"#,
            )
            .unwrap();
        let state = CompletionState::load(&store, &selection("2024-01-01")).unwrap();
        assert!(state.history().contains(&DateKey::parse("2024-01-01").unwrap()));
        assert!(store.get(COMPLETION_HISTORY_KEY).unwrap().is_some());
    }

    #[test]
    fn history_accumulates_across_days() {
        let store = MemoryProgressStore::new();
        for date in ["2024-01-01", "2024-01-02"] {
            let sel = selection(date);
            let mut state = CompletionState::load(&store, &sel).unwrap();
            for id in sel.item_ids() {
                state.toggle(&store, &id).unwrap();
            }
        }
        let state = CompletionState::load(&store, &selection("2024-01-03")).unwrap();
        assert_eq!(state.history().len(), 2);
        assert!(state.completed_ids().is_empty());
    }

    #[test]
    fn reject_item_outside_selection() {
        let store = MemoryProgressStore::new();
        let mut state = CompletionState::load(&store, &selection("2024-01-01")).unwrap();
        let result = state.toggle(&store, "h1");
        assert!(matches!(result, Err(EngineError::UnknownItem(id)) if id == "h1"));
    }

    #[test]
    fn storage_failure_propagates() {
        let result = CompletionState::load(&FailingStore, &selection("2024-01-01"));
        assert!(matches!(result, Err(EngineError::StorageUnavailable(_))));
    }

    #[test]
    fn corrupt_value_is_storage_error() {
        let store = MemoryProgressStore::new();
        store.set(COMPLETION_HISTORY_KEY, "not json").unwrap();
        let result = CompletionState::load(&store, &selection("2024-01-01"));
        assert!(matches!(result, Err(EngineError::StorageUnavailable(_))));
    }

    #[test]
    fn favorites_toggle_and_persist() {
        let store = MemoryProgressStore::new();
        let mut favs = Favorites::load(&store, ContentKind::Word).unwrap();
        assert!(favs.toggle(&store, "w1_1").unwrap());
        assert!(favs.toggle(&store, "w1_2").unwrap());
        assert!(!favs.toggle(&store, "w1_1").unwrap());

        let reloaded = Favorites::load(&store, ContentKind::Word).unwrap();
        assert_eq!(reloaded.ids(), &["w1_2".to_string()]);
        assert!(Favorites::load(&store, ContentKind::Phrase)
            .unwrap()
            .ids()
            .is_empty());
    }
}
