use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use serde_json::Value;
use std::path::PathBuf;
use todostore::models::{parse_due, parse_priority};
use todostore::{DEFAULT_API_URL, FileStorage, LocalStore, NewTask, RemoteStore, Task, TaskPatch};

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - To-do lists synced with a REST backend or local storage")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Directory for local storage (default: the platform data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with lists kept in local storage
    Local {
        #[command(subcommand)]
        command: LocalCommand,
    },

    /// Work with tasks held by the backend service
    Remote {
        /// Base URL of the backend
        #[arg(long, default_value = DEFAULT_API_URL)]
        api_url: String,

        #[command(subcommand)]
        command: RemoteCommand,
    },
}

#[derive(Subcommand)]
enum LocalCommand {
    /// Show all lists with their pending counts
    Lists,
    /// Create a new list
    AddList { name: String },
    /// Make a list the current one
    Select { name: String },
    /// Set the date filter (upcoming, today, past)
    Filter { value: String },
    /// Add a task to the current list
    Add(NewTaskArgs),
    /// Toggle a task in the current list
    Toggle { id: String },
    /// Show tasks of the current list
    Show {
        /// Ignore the date filter
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
enum RemoteCommand {
    /// Show all tasks
    List,
    /// Create a task
    Add(NewTaskArgs),
    /// Delete a task
    Remove { id: String },
    /// Change fields of a task
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// RFC 3339 timestamp or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        done: Option<bool>,
    },
    /// Toggle a task's done flag
    Toggle { id: String },
}

#[derive(Args)]
struct NewTaskArgs {
    name: String,
    #[arg(short, long)]
    description: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD
    #[arg(long)]
    due: Option<String>,
    #[arg(short, long)]
    priority: Option<String>,
}

impl NewTaskArgs {
    /// Local tasks keep priorities as typed JSON (`1` stays a number)
    fn into_new_task(self) -> Result<NewTask> {
        let priority = self.priority.as_deref().map(parse_priority).unwrap_or_default();
        self.build(priority)
    }

    /// The backend only accepts string priorities
    fn into_remote_task(self) -> Result<NewTask> {
        let priority = self.priority.clone().map(Value::String).unwrap_or_default();
        self.build(priority)
    }

    fn build(self, priority: Value) -> Result<NewTask> {
        Ok(NewTask {
            name: self.name,
            description: self.description,
            due: self.due.as_deref().map(parse_due).transpose()?,
            priority,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Local { command } => {
            let store_path = cli.store_path.unwrap_or_else(default_store_path);
            run_local(store_path, command)
        }
        Commands::Remote { api_url, command } => run_remote(api_url, command).await,
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("todostore"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn run_local(store_path: PathBuf, command: LocalCommand) -> Result<()> {
    let mut store = LocalStore::open(FileStorage::open(&store_path)?)?;

    match command {
        LocalCommand::Lists => {
            for list in store.lists() {
                let marker = if list.name == store.current_list() { "*" } else { " " };
                println!("{} {} ({} pending)", marker, list.name.bold(), store.pending_count(&list.name));
            }
        }
        LocalCommand::AddList { name } => {
            store.add_list(name.clone());
            println!("Added list {}", name.bold());
        }
        LocalCommand::Select { name } => {
            store.select_list(name.clone());
            if store.lists().iter().all(|l| l.name != name) {
                println!("{}", format!("No list named {} yet", name).yellow());
            }
        }
        LocalCommand::Filter { value } => {
            store.set_date_filter(value);
            println!("Date filter: {}", store.date_filter());
        }
        LocalCommand::Add(args) => match store.add_task(args.into_new_task()?) {
            Some(id) => println!("Added task {}", id.dimmed()),
            None => println!("{}", "No current list; select one first".yellow()),
        },
        LocalCommand::Toggle { id } => {
            if !store.toggle_done(&id) {
                println!("{}", format!("No task {} in the current list", id).yellow());
            }
        }
        LocalCommand::Show { all } => {
            let tasks: Vec<&Task> = if all {
                store.current_tasks().iter().collect()
            } else {
                store.filtered_tasks(chrono::Utc::now().date_naive())
            };
            println!(
                "{} [{}] {} pending",
                store.current_list().bold(),
                store.date_filter(),
                store.pending_count(store.current_list())
            );
            for task in tasks {
                print_task(task);
            }
        }
    }

    Ok(())
}

async fn run_remote(api_url: String, command: RemoteCommand) -> Result<()> {
    let mut store = RemoteStore::with_base_url(api_url);
    store.fetch_all().await;

    match command {
        RemoteCommand::List => {}
        RemoteCommand::Add(args) => store.add(args.into_remote_task()?).await,
        RemoteCommand::Remove { id } => store.remove(&id).await,
        RemoteCommand::Update {
            id,
            name,
            description,
            due,
            priority,
            done,
        } => {
            let patch = remote_patch(name, description, due, priority, done)?;
            if patch.is_empty() {
                println!("{}", "Nothing to update".yellow());
            } else {
                store.update(&id, patch).await;
            }
        }
        RemoteCommand::Toggle { id } => store.toggle_done(&id).await,
    }

    println!("{} pending", store.pending_count());
    for task in store.tasks() {
        print_task(task);
    }
    Ok(())
}

/// Build a partial update from CLI flags; priorities go to the backend as strings
fn remote_patch(
    name: Option<String>,
    description: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    done: Option<bool>,
) -> Result<TaskPatch> {
    Ok(TaskPatch {
        name,
        description,
        due: due.as_deref().map(parse_due).transpose()?,
        priority: priority.map(Value::String),
        done,
    })
}

fn print_task(task: &Task) {
    let check = if task.done { "[x]".green() } else { "[ ]".yellow() };
    let due = task.due.as_deref().unwrap_or("-");
    println!("{} {} {} {}", check, task.name, due.dimmed(), task.id.dimmed());
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        println!("    {}", description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(priority: &str) -> NewTaskArgs {
        NewTaskArgs {
            name: "Buy milk".to_string(),
            description: None,
            due: Some("2024-05-10".to_string()),
            priority: Some(priority.to_string()),
        }
    }

    #[test]
    fn test_local_priority_is_typed() {
        let task = args("1").into_new_task().unwrap();
        assert_eq!(task.priority, json!(1));
    }

    #[test]
    fn test_remote_priority_is_string() {
        let task = args("1").into_remote_task().unwrap();
        assert_eq!(task.priority, json!("1"));
        assert_eq!(serde_json::to_value(&task).unwrap()["priority"], json!("1"));
    }

    #[test]
    fn test_remote_update_priority_is_string() {
        let cli = Cli::try_parse_from(["todostore", "remote", "update", "abc", "--priority", "2"]).unwrap();
        let Commands::Remote {
            command:
                RemoteCommand::Update {
                    name,
                    description,
                    due,
                    priority,
                    done,
                    ..
                },
            ..
        } = cli.command
        else {
            panic!("expected remote update");
        };

        let patch = remote_patch(name, description, due, priority, done).unwrap();
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"priority": "2"}));
    }
}
