pub mod document;
pub mod error;
pub mod memory;
pub mod models;

use async_trait::async_trait;
pub use document::Document;
pub use error::DatastoreError;

use crate::models::{Decision, EventUpdate, NewApplication, NewEvent};

/// The narrow asynchronous data-access interface the workflow is written
/// against. Implementations wrap the real document store; tests use
/// [`memory::MemoryStore`].
///
/// List operations documented as "newest first" may be backed by a store
/// that refuses the ordered query when a composite index is missing; the
/// implementation is expected to retry without ordering and sort
/// client-side by creation time, so callers always observe the same
/// ordering.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// All events, newest first.
    async fn list_events(&self) -> Result<Vec<Document>, DatastoreError>;

    /// Events owned by `owner_id`, newest first.
    async fn list_events_by_owner(&self, owner_id: &str)
        -> Result<Vec<Document>, DatastoreError>;

    /// Applications referencing `event_id`, in store order.
    async fn list_applications_by_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<Document>, DatastoreError>;

    /// Applications submitted by `user_id`, newest first.
    async fn list_applications_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Document>, DatastoreError>;

    /// `Ok(None)` when no such event exists; not-found is not an error.
    async fn get_event_by_id(&self, id: &str) -> Result<Option<Document>, DatastoreError>;

    /// `Ok(None)` when no profile exists for `user_id` or when `user_id`
    /// is blank.
    async fn get_user_profile_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<Document>, DatastoreError>;

    /// Returns the id assigned by the store.
    async fn create_event(&self, event: NewEvent) -> Result<String, DatastoreError>;

    async fn update_event(&self, id: &str, updates: EventUpdate)
        -> Result<(), DatastoreError>;

    /// Returns the id assigned by the store. Status is forced to
    /// `pending` regardless of the payload.
    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<String, DatastoreError>;

    /// Persists the decided status and an update timestamp. The store
    /// itself performs no transition check; the workflow's gate is the
    /// only guard against rewriting a terminal status.
    async fn set_application_status(
        &self,
        id: &str,
        decision: Decision,
    ) -> Result<(), DatastoreError>;
}
