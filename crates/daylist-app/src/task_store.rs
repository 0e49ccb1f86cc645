//! Authoritative owner of the task collection and the current view parameters.

use std::collections::HashSet;
use std::fmt;

use daylist_core::{
    Filter, Priority, SortOrder, Task, TaskId, ViewQuery, ViewStats, decode_tasks, encode_tasks,
    parse_due_date, project, stats,
};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::{TaskStoreError, TaskStoreResult};
use crate::samples::sample_tasks;
use crate::storage::KeyValueStore;

/// Storage key holding the serialized task array.
pub const STORAGE_KEY: &str = "todos";

/// Notification delivered to listeners after an effective change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// A task was prepended.
    Added(TaskId),
    /// A task was removed.
    Deleted(TaskId),
    /// A task's completion flag flipped.
    Toggled(TaskId),
    /// Completed tasks were removed in bulk.
    ClearedCompleted {
        /// Number of tasks removed.
        removed: usize,
    },
    /// Filter, search query, or sort order changed.
    ViewChanged,
}

type Listener = Box<dyn FnMut(&StoreChange)>;
type Clock = Box<dyn Fn() -> OffsetDateTime>;

/// Task collection (newest first) plus transient view parameters.
pub struct TaskStore<S> {
    storage: S,
    tasks: Vec<Task>,
    query: ViewQuery,
    clock: Clock,
    listeners: Vec<Listener>,
    fresh: bool,
}

impl<S> fmt::Debug for TaskStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("query", &self.query)
            .field("listeners", &self.listeners.len())
            .field("fresh", &self.fresh)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Read the persisted collection once.
    ///
    /// An absent or unparseable blob yields an empty collection. Records with
    /// blank text or an id seen earlier in the blob are dropped.
    ///
    /// # Errors
    /// Returns [`TaskStoreError::Storage`] when the backing store cannot be read.
    pub fn load(storage: S) -> TaskStoreResult<Self> {
        let raw = storage
            .get(STORAGE_KEY)
            .map_err(|err| TaskStoreError::Storage(err.into()))?;
        let fresh = raw.is_none();
        let tasks = match raw {
            None => Vec::new(),
            Some(blob) => match decode_tasks(&blob) {
                Ok(tasks) => retain_valid(tasks),
                Err(err) => {
                    warn!(error = %err, key = STORAGE_KEY, "Discarding unreadable task list");
                    Vec::new()
                }
            },
        };
        debug!(count = tasks.len(), fresh, "Loaded tasks");
        Ok(Self {
            storage,
            tasks,
            query: ViewQuery::default(),
            clock: Box::new(OffsetDateTime::now_utc),
            listeners: Vec::new(),
            fresh,
        })
    }

    /// Replace the clock used for ids and creation timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> OffsetDateTime + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Start from the given view parameters instead of the defaults.
    #[must_use]
    pub fn with_query(mut self, query: ViewQuery) -> Self {
        self.query = query;
        self
    }

    /// Write the welcome tasks when nothing was ever stored under [`STORAGE_KEY`].
    ///
    /// Returns the number of tasks seeded (zero when the key existed).
    ///
    /// # Errors
    /// Returns [`TaskStoreError::Storage`] when the seeded list cannot be written.
    pub fn seed_samples(&mut self) -> TaskStoreResult<usize> {
        if !self.fresh || !self.tasks.is_empty() {
            return Ok(0);
        }
        self.tasks = sample_tasks((self.clock)());
        self.fresh = false;
        self.persist()?;
        info!(count = self.tasks.len(), "Seeded sample tasks");
        Ok(self.tasks.len())
    }

    /// Create a task and place it first.
    ///
    /// # Errors
    /// Returns [`TaskStoreError::Validation`] for blank text (nothing is changed or
    /// written), [`TaskStoreError::IdsExhausted`] when no id is left, and
    /// [`TaskStoreError::Storage`] when the write fails.
    pub fn add(&mut self, text: &str, priority: Priority, due_date: Option<Date>) -> TaskStoreResult<Task> {
        let now = (self.clock)();
        let id = TaskId::allocate(now, self.tasks.iter().map(|task| task.id))
            .ok_or(TaskStoreError::IdsExhausted)?;
        let task = Task::new(id, text, priority, due_date, now)?;
        self.tasks.insert(0, task.clone());
        self.commit(&StoreChange::Added(task.id))?;
        info!(id = %task.id, priority = %task.priority, "Added task");
        Ok(task)
    }

    /// Like [`add`](Self::add), taking the due date as raw form input.
    ///
    /// Blank input means no due date.
    ///
    /// # Errors
    /// Returns [`TaskStoreError::Validation`] for blank text or a malformed date.
    pub fn add_with_due_input(
        &mut self,
        text: &str,
        priority: Priority,
        raw_due: &str,
    ) -> TaskStoreResult<Task> {
        let due_date = parse_due_date(raw_due)?;
        self.add(text, priority, due_date)
    }

    /// Remove the task with `id`. Unknown ids are ignored.
    ///
    /// Returns whether a task was removed.
    ///
    /// # Errors
    /// Returns [`TaskStoreError::Storage`] when the write fails.
    pub fn delete(&mut self, id: TaskId) -> TaskStoreResult<bool> {
        let Some(idx) = self.position(id) else {
            debug!(%id, "Delete ignored for unknown task");
            return Ok(false);
        };
        self.tasks.remove(idx);
        self.commit(&StoreChange::Deleted(id))?;
        info!(%id, "Deleted task");
        Ok(true)
    }

    /// Flip completion of the task with `id`. Unknown ids are ignored.
    ///
    /// Returns whether a task was toggled.
    ///
    /// # Errors
    /// Returns [`TaskStoreError::Storage`] when the write fails.
    pub fn toggle_complete(&mut self, id: TaskId) -> TaskStoreResult<bool> {
        let Some(idx) = self.position(id) else {
            debug!(%id, "Toggle ignored for unknown task");
            return Ok(false);
        };
        self.tasks[idx] = self.tasks[idx].toggled();
        self.commit(&StoreChange::Toggled(id))?;
        info!(%id, completed = self.tasks[idx].completed, "Toggled task");
        Ok(true)
    }

    /// Remove every completed task, returning how many were removed.
    ///
    /// # Errors
    /// Returns [`TaskStoreError::Storage`] when the write fails.
    pub fn clear_completed(&mut self) -> TaskStoreResult<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(&StoreChange::ClearedCompleted { removed })?;
        info!(removed, "Cleared completed tasks");
        Ok(removed)
    }

    /// Persist the mutated collection, then notify listeners even if the write failed.
    fn commit(&mut self, change: &StoreChange) -> TaskStoreResult<()> {
        let persisted = self.persist();
        if let Err(err) = &persisted {
            warn!(error = %err, ?change, "Change kept in memory but not persisted");
        }
        self.notify(change);
        persisted
    }

    fn persist(&self) -> TaskStoreResult<()> {
        let blob = encode_tasks(&self.tasks).map_err(anyhow::Error::from)?;
        self.storage
            .set(STORAGE_KEY, &blob)
            .map_err(|err| TaskStoreError::Storage(err.into()))?;
        debug!(count = self.tasks.len(), bytes = blob.len(), "Persisted tasks");
        Ok(())
    }
}

fn retain_valid(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    tasks
        .into_iter()
        .filter(|task| {
            if task.text.trim().is_empty() {
                warn!(id = %task.id, "Dropping stored task with blank text");
                return false;
            }
            if !seen.insert(task.id) {
                warn!(id = %task.id, "Dropping stored task with duplicate id");
                return false;
            }
            true
        })
        .collect()
}

impl<S> TaskStore<S> {
    /// Read-only snapshot in insertion order (newest first).
    #[must_use]
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Current view parameters.
    #[must_use]
    pub const fn query(&self) -> &ViewQuery {
        &self.query
    }

    /// Set the subset filter.
    pub fn set_filter(&mut self, filter: Filter) {
        self.query.filter = filter;
        self.notify(&StoreChange::ViewChanged);
    }

    /// Set the search query (matched case-insensitively).
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query.search = query.into();
        self.notify(&StoreChange::ViewChanged);
    }

    /// Set the sort order directly.
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.query.sort = order;
        self.notify(&StoreChange::ViewChanged);
    }

    /// Advance the sort order one step through [`SortOrder::CYCLE`].
    pub fn cycle_sort_order(&mut self) -> SortOrder {
        let next = self.query.sort.next();
        self.set_sort_order(next);
        next
    }

    /// Tasks to display under the current view parameters.
    #[must_use]
    pub fn visible(&self, now: OffsetDateTime) -> Vec<&Task> {
        project(&self.tasks, &self.query, now)
    }

    /// Counts over the whole collection.
    #[must_use]
    pub fn stats(&self, now: OffsetDateTime) -> ViewStats {
        stats(&self.tasks, now)
    }

    /// Register a listener invoked after every effective change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn notify(&mut self, change: &StoreChange) {
        for listener in &mut self.listeners {
            listener(change);
        }
    }
}
