// Remote-backed store: mirrors a backend task collection over HTTP

use eyre::{Context, Result, eyre};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, error};

use crate::models::{NewTask, Task, TaskPatch};

/// Fixed address of the backend service
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Flat task list kept in step with the backend's `/todos` collection
///
/// Local state only ever changes from a successful server response. Failures
/// are reported through tracing and never returned or retried.
pub struct RemoteStore {
    client: Client,
    base_url: String,
    tasks: Vec<Task>,
}

impl Default for RemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            tasks: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks not yet done
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }

    /// Replace local state with the backend's full collection
    pub async fn fetch_all(&mut self) {
        match self.try_fetch_all().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "Fetched tasks");
                self.tasks = tasks;
            }
            Err(e) => error!(error = %e, "Error fetching tasks"),
        }
    }

    /// Create a task on the backend and append the returned representation
    pub async fn add(&mut self, task: NewTask) {
        match self.try_add(&task).await {
            Ok(created) => {
                debug!(id = %created.id, "Added task");
                self.tasks.push(created);
            }
            Err(e) => error!(error = %e, "Error adding task"),
        }
    }

    /// Delete a task; local state changes only on a 204 response
    pub async fn remove(&mut self, id: &str) {
        match self.try_remove(id).await {
            Ok(()) => {
                debug!(id, "Removed task");
                self.tasks.retain(|t| t.id != id);
            }
            Err(e) => error!(error = %e, id, "Error deleting task"),
        }
    }

    /// Send a partial update and store the backend's version of the task
    ///
    /// The response is dropped if the task is no longer held locally.
    pub async fn update(&mut self, id: &str, patch: TaskPatch) {
        match self.try_update(id, &patch).await {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *slot = updated;
                }
            }
            Err(e) => error!(error = %e, id, "Error updating task"),
        }
    }

    /// Flip `done` through [`RemoteStore::update`]; no-op for unknown ids
    pub async fn toggle_done(&mut self, id: &str) {
        let Some(done) = self.tasks.iter().find(|t| t.id == id).map(|t| t.done) else {
            return;
        };
        self.update(id, TaskPatch::done(!done)).await;
    }

    // ========================================================================
    // HTTP calls
    // ========================================================================

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: &str) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    async fn try_fetch_all(&self) -> Result<Vec<Task>> {
        let resp = self
            .client
            .get(self.todos_url())
            .send()
            .await
            .context("Failed to fetch tasks")?;
        let resp = ensure_success(resp, "Failed to fetch tasks").await?;
        resp.json().await.context("Failed to decode task list")
    }

    async fn try_add(&self, task: &NewTask) -> Result<Task> {
        let resp = self
            .client
            .post(self.todos_url())
            .json(task)
            .send()
            .await
            .context("Failed to add task")?;
        let resp = ensure_success(resp, "Failed to add task").await?;
        resp.json().await.context("Failed to decode created task")
    }

    async fn try_remove(&self, id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.todo_url(id))
            .send()
            .await
            .context("Failed to delete task")?;

        let status = resp.status();
        if status != StatusCode::NO_CONTENT {
            return Err(eyre!("Failed to delete task: HTTP {}", status.as_u16()));
        }
        Ok(())
    }

    async fn try_update(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let resp = self
            .client
            .patch(self.todo_url(id))
            .json(patch)
            .send()
            .await
            .context("Failed to update task")?;
        let resp = ensure_success(resp, "Failed to update task").await?;
        resp.json().await.context("Failed to decode updated task")
    }
}

async fn ensure_success(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    Err(eyre!("{}: HTTP {} {}", what, status.as_u16(), text))
}
