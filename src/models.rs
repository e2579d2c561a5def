// Data models for TodoStore

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use eyre::{Result, eyre};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::filter::DateFilter;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// ISO-8601 timestamp
    #[serde(default)]
    pub due: Option<String>,
    /// Opaque to the store; the backend uses strings, local callers often numbers
    #[serde(default)]
    pub priority: Value,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// UTC calendar date of `due`, if it parses as RFC 3339
    pub fn due_date(&self) -> Option<NaiveDate> {
        let due = self.due.as_deref()?;
        DateTime::parse_from_rfc3339(due)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    }
}

/// Fields supplied when creating a task. The id and `done` flag are assigned by the store or backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Value,
}

impl NewTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build the stored task, normalizing `due` to an ISO-8601 string with millisecond precision
    pub fn into_task(self, id: String) -> Task {
        Task {
            id,
            name: self.name,
            description: self.description,
            due: self.due.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            priority: self.priority,
            done: false,
        }
    }
}

/// Partial update sent to the backend; only set fields are serialized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl TaskPatch {
    pub fn done(done: bool) -> Self {
        Self {
            done: Some(done),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A named container of tasks (local store only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoList {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TodoList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }
}

/// Everything the local store persists, as one JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default, deserialize_with = "null_as_default")]
    pub lists: Vec<TodoList>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_list: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter_by_date: DateFilter,
}

// Explicit nulls in stored documents get the same default as missing keys
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl AppState {
    /// First list with the given name; duplicates are shadowed
    pub fn find_list(&self, name: &str) -> Option<&TodoList> {
        self.lists.iter().find(|l| l.name == name)
    }

    pub fn find_list_mut(&mut self, name: &str) -> Option<&mut TodoList> {
        self.lists.iter_mut().find(|l| l.name == name)
    }
}

/// Parse a due timestamp given as RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC)
pub fn parse_due(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| eyre!("Invalid due date: {} (expected RFC 3339 or YYYY-MM-DD)", input))
}

/// Parse a priority as JSON when possible, otherwise keep it as a string
pub fn parse_priority(input: &str) -> Value {
    serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.to_string()))
}
