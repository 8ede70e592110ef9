pub mod error;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use error::{PersistenceError, StoreError, ValidationError};
pub use model::task::Task;
pub use repository::{FileTaskRepository, TaskRepository};
pub use service::list_store::{TaskListStore, DEFAULT_PAGE_SIZE};
pub use service::views::{
    filter_tasks, paginate, sort_tasks, visible_page, SortDirection, SortKey,
};
pub use time::{format_due_date, parse_due_date, today};
