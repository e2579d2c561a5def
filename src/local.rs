// Local-backed store: named task lists persisted to key/value storage

use chrono::NaiveDate;
use eyre::{Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::filter::DateFilter;
use crate::models::{AppState, NewTask, Task, TodoList};
use crate::storage::Storage;

/// Key under which the whole application state is persisted
pub const STORAGE_KEY: &str = "vue-todos";

/// Multiple named task lists plus a date filter, saved after every mutation
///
/// List lookups are by name and the first match wins; `add_list` does not
/// reject duplicates.
pub struct LocalStore<S: Storage> {
    storage: S,
    state: AppState,
}

impl<S: Storage> LocalStore<S> {
    /// Create a store with default state, without reading storage
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: AppState::default(),
        }
    }

    /// Create a store and load any persisted state
    pub fn open(storage: S) -> Result<Self> {
        let mut store = Self::new(storage);
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory state with the persisted document, if there is one
    ///
    /// Malformed documents are an error; call this once at startup.
    pub fn load(&mut self) -> Result<()> {
        // An empty document counts as absent
        let Some(raw) = self
            .storage
            .get_item(STORAGE_KEY)?
            .filter(|raw| !raw.trim().is_empty())
        else {
            debug!(key = STORAGE_KEY, "No persisted state, keeping current state");
            return Ok(());
        };

        self.state = serde_json::from_str(&raw).context("Failed to parse persisted todo state")?;
        debug!(
            key = STORAGE_KEY,
            lists = self.state.lists.len(),
            current_list = %self.state.current_list,
            "Loaded persisted state"
        );
        Ok(())
    }

    /// Write the full state under [`STORAGE_KEY`]
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.state).context("Failed to serialize todo state")?;
        self.storage.set_item(STORAGE_KEY, &json)?;
        debug!(key = STORAGE_KEY, "Saved state");
        Ok(())
    }

    // Mutations persist through here; failures are logged, never returned
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to persist todo state");
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn lists(&self) -> &[TodoList] {
        &self.state.lists
    }

    pub fn current_list(&self) -> &str {
        &self.state.current_list
    }

    pub fn date_filter(&self) -> &DateFilter {
        &self.state.filter_by_date
    }

    /// Tasks of the current list, or empty if the current name resolves to nothing
    pub fn current_tasks(&self) -> &[Task] {
        self.state
            .find_list(&self.state.current_list)
            .map(|l| l.tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Current tasks narrowed by the active date filter
    pub fn filtered_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        self.current_tasks()
            .iter()
            .filter(|t| self.state.filter_by_date.matches(t, today))
            .collect()
    }

    /// Not-done tasks in the named list; 0 if no such list
    pub fn pending_count(&self, list_name: &str) -> usize {
        self.state.find_list(list_name).map_or(0, TodoList::pending_count)
    }

    pub fn add_list(&mut self, name: impl Into<String>) {
        self.state.lists.push(TodoList::new(name));
        self.persist();
    }

    /// Point the current list at `name`, whether or not such a list exists
    pub fn select_list(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.state.current_list == name {
            return;
        }
        self.state.current_list = name;
        self.persist();
    }

    /// Set the filter as given; unknown values are kept as-is
    pub fn set_date_filter(&mut self, filter: impl Into<DateFilter>) {
        let filter = filter.into();
        if self.state.filter_by_date == filter {
            return;
        }
        self.state.filter_by_date = filter;
        self.persist();
    }

    /// Append a task to the current list and return its new id
    ///
    /// Returns `None` without touching state if there is no current list.
    pub fn add_task(&mut self, task: NewTask) -> Option<String> {
        let current = self.state.current_list.clone();
        let Some(list) = self.state.find_list_mut(&current) else {
            info!(current_list = %current, "No current list");
            return None;
        };

        let id = Uuid::now_v7().to_string();
        list.tasks.push(task.into_task(id.clone()));
        self.persist();
        Some(id)
    }

    /// Flip `done` on a task of the current list. Returns whether a task was found.
    pub fn toggle_done(&mut self, id: &str) -> bool {
        let current = self.state.current_list.clone();
        let Some(task) = self
            .state
            .find_list_mut(&current)
            .and_then(|l| l.tasks.iter_mut().find(|t| t.id == id))
        else {
            return false;
        };

        task.done = !task.done;
        self.persist();
        true
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
