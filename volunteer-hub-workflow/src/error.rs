use volunteer_hub_datastore::DatastoreError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The caller lacks permission for a mutation. No write happened.
    #[error("{0}")]
    Unauthorized(String),
    /// A required identifier or field was missing; rejected before any
    /// backend call.
    #[error("{0}")]
    Validation(String),
    /// The application already reached a terminal status; the transition
    /// was refused and nothing was written.
    #[error("application {id} was already {status}")]
    AlreadyDecided { id: String, status: &'static str },
    /// Transient backend failure on a bulk fetch or a mutation. The
    /// affected view shows a retry affordance.
    #[error("datastore error: {0}")]
    Datastore(#[from] DatastoreError),
}
