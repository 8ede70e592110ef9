use thiserror::Error;

/// Recoverable input errors. The collection is never changed when one of
/// these is returned; the frontend shows the message and keeps going.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Task text cannot be empty.")]
    EmptyText,
    #[error("A task named '{0}' already exists.")]
    DuplicateText(String),
    #[error("Invalid date '{0}', expected YYYY-MM-DD.")]
    InvalidDueDate(String),
    #[error("Due date '{0}' cannot be in the past.")]
    DueDateInPast(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access task storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("stored tasks are corrupt: {0}")]
    Deserialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No task with id {0}.")]
    NotFound(i64),
    // The in-memory mutation has already been applied when this is
    // returned. The caller must warn that the change may not survive
    // a restart.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
