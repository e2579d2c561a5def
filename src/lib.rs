// TodoStore - To-do list state synced with a REST backend or local storage

pub mod filter;
pub mod local;
pub mod models;
pub mod remote;
pub mod storage;

// Re-export main types for convenience
pub use filter::DateFilter;
pub use local::{LocalStore, STORAGE_KEY};
pub use models::{AppState, NewTask, Task, TaskPatch, TodoList};
pub use remote::{DEFAULT_API_URL, RemoteStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
