pub mod list_store;
pub mod views;

pub use list_store::TaskListStore;
pub use views::{SortDirection, SortKey};
