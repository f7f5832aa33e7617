use thiserror::Error;

/// Failures surfaced by a [`crate::Datastore`] implementation.
///
/// "Not found" is deliberately absent: a missing entity is an `Ok(None)`
/// on the lookup operations, never an error.
#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum DatastoreError {
    #[error("{operation}: store has no composite index for this query")]
    MissingIndex { operation: &'static str },
    #[error("{operation} failed for {id}: {message}")]
    Backend {
        operation: &'static str,
        id: String,
        message: String,
    },
}

impl DatastoreError {
    pub fn backend(operation: &'static str, id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            id: id.into(),
            message: message.into(),
        }
    }
}
