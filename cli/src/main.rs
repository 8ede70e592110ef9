mod tui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskdeck_core::{
    FileTaskRepository, SortDirection, Task, TaskListStore, DEFAULT_PAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Personal task list with search, sort and pagination", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        text: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Due date (YYYY-MM-DD); defaults to today when absent or invalid
        #[arg(short = 'u', long, default_value = "")]
        due: String,
    },
    /// List tasks, optionally searched, sorted and paginated
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Flip completion on one task
    Toggle { id: i64 },
    /// Edit a task's text, description or due date
    Edit {
        id: i64,
        #[arg(short, long)]
        text: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// New due date (YYYY-MM-DD), must not be in the past
        #[arg(short = 'u', long)]
        due: Option<String>,
    },
    /// Delete one task
    Delete { id: i64 },
    /// Delete every completed task
    ClearCompleted,
    /// Complete everything, or reopen everything if all were done
    ToggleAll,
    /// Mark every task completed
    DoneAll,
    /// Set a task's due date (YYYY-MM-DD, not in the past)
    Due { id: i64, date: String },
    /// Show incomplete tasks due within the next days
    Upcoming {
        #[arg(long, default_value_t = 2)]
        days: i64,
    },
    /// Open the terminal UI
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    TextAsc,
    TextDesc,
    DueDate,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "St")]
    status: &'static str,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            status: if task.completed { "✔" } else { "☐" },
            due: task.due_date.clone(),
            text: task.text.clone(),
            description: task.description.clone(),
        }
    }
}

fn print_tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    let rows: Vec<TaskRow> = tasks.iter().map(|t| TaskRow::from_task(t)).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let repo = FileTaskRepository::new(None).context("failed to open task storage")?;
    let mut store = TaskListStore::open(repo).context("failed to load tasks")?;

    match cli.command {
        Some(Commands::Add {
            text,
            description,
            due,
        }) => {
            let id = store.add_task(&text, &description, &due)?;
            let due = store
                .tasks()
                .iter()
                .find(|t| t.id == id)
                .map(|t| t.due_date.clone())
                .unwrap_or_default();
            println!("Added task {id} (due {due})");
        }
        Some(Commands::List {
            search,
            sort,
            page,
            page_size,
        }) => {
            store.set_search_text(search);
            match sort {
                Some(SortArg::TextAsc) => store.sort_by_text(SortDirection::Ascending)?,
                Some(SortArg::TextDesc) => store.sort_by_text(SortDirection::Descending)?,
                Some(SortArg::DueDate) => store.sort_by_due_date()?,
                None => {}
            }
            store.set_page_size(page_size);
            store.set_current_page(page);

            print_tasks(&store.paginated_tasks());
            println!(
                "Page {}/{} ({} open)",
                store.current_page(),
                store.total_pages().max(1),
                store.incomplete_count()
            );
        }
        Some(Commands::Toggle { id }) => {
            store.toggle_completion(id)?;
            println!("Toggled {id}");
        }
        Some(Commands::Edit {
            id,
            text,
            description,
            due,
        }) => {
            store.begin_edit(id);
            if store.editing_id().is_none() {
                println!("No task with id {id}.");
                return Ok(());
            }
            if let Some(text) = text {
                store.edit_text = text;
            }
            if let Some(description) = description {
                store.edit_description = description;
            }
            // Without --due the task keeps its existing due date; an
            // empty draft routes around the not-in-the-past check that
            // would otherwise re-validate an old date
            match due {
                Some(due) => store.edit_due_date = due,
                None => store.edit_due_date.clear(),
            }
            store.save_edit()?;
            println!("Updated {id}");
        }
        Some(Commands::Delete { id }) => {
            store.delete_task(id)?;
            println!("Deleted {id}");
        }
        Some(Commands::ClearCompleted) => {
            let removed = store.delete_completed()?;
            println!("Removed {removed} completed task(s)");
        }
        Some(Commands::ToggleAll) => {
            store.toggle_all_completed()?;
            println!(
                "{} task(s) now open",
                store.incomplete_count()
            );
        }
        Some(Commands::DoneAll) => {
            store.mark_all_completed()?;
            println!("All tasks completed");
        }
        Some(Commands::Due { id, date }) => {
            store.update_due_date(id, &date)?;
            println!("Due date of {id} set to {date}");
        }
        Some(Commands::Upcoming { days }) => {
            let upcoming = store.upcoming_tasks(days);
            if upcoming.is_empty() {
                println!("Nothing due within {days} day(s).");
            } else {
                print_tasks(&upcoming);
            }
        }
        Some(Commands::Tui) | None => {
            tui::run(store)?;
        }
    }

    Ok(())
}
