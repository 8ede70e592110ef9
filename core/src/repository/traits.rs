use crate::error::PersistenceError;
use crate::model::task::Task;

/// Persistence adapter for the task collection. One fixed slot, written
/// all-or-nothing: `save` overwrites whatever was there, `load` returns
/// the whole collection.
pub trait TaskRepository {
    /// An absent slot is an empty collection, not an error.
    fn load(&self) -> Result<Vec<Task>, PersistenceError>;
    fn save(&self, tasks: &[Task]) -> Result<(), PersistenceError>;
}
