//! In-memory [`Datastore`] used by the workflow tests.
//!
//! Besides the plain contract it can simulate the two awkward behaviors of
//! the real backend: a missing composite index on the ordered queries
//! (which triggers the retry-unordered-and-sort-client-side fallback) and
//! per-identifier transient failures (for exercising the degraded
//! enrichment path).

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::models::{Decision, EventUpdate, NewApplication, NewEvent};
use crate::{Datastore, DatastoreError, Document};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<Document>,
    applications: Vec<Document>,
    users: Vec<Document>,
    next_id: u64,
    missing_index: bool,
    fail_keys: HashSet<String>,
}

#[derive(Debug, Clone, Copy)]
enum Table {
    Events,
    Applications,
}

impl Inner {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn table(&self, table: Table) -> &[Document] {
        match table {
            Table::Events => &self.events,
            Table::Applications => &self.applications,
        }
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Creation time of a raw record, epoch when absent or unparseable.
/// Matches the client-side fallback sort of the real backend adapter.
fn created_at(doc: &Document) -> DateTime<Utc> {
    doc.str_field("createdAt")
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map_or(DateTime::UNIX_EPOCH, |parsed| parsed.with_timezone(&Utc))
}

fn newest_first(mut docs: Vec<Document>) -> Vec<Document> {
    docs.sort_by_key(|doc| std::cmp::Reverse(created_at(doc)));
    docs
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }

    /// Make every ordered composite query fail its first attempt, forcing
    /// the unordered-retry fallback.
    pub fn simulate_missing_index(&self) {
        self.lock().missing_index = true;
    }

    /// Inject a transient failure for one `(operation, identifier)` pair.
    pub fn fail_on(&self, operation: &str, id: &str) {
        self.lock().fail_keys.insert(format!("{operation}:{id}"));
    }

    fn check_fail(&self, operation: &'static str, id: &str) -> Result<(), DatastoreError> {
        if self.lock().fail_keys.contains(&format!("{operation}:{id}")) {
            return Err(DatastoreError::backend(operation, id, "injected failure"));
        }
        Ok(())
    }

    /// Insert a raw event record as-is, legacy field names included.
    pub fn seed_event(&self, doc: Document) {
        self.lock().events.push(doc);
    }

    pub fn seed_application(&self, doc: Document) {
        self.lock().applications.push(doc);
    }

    pub fn seed_user(&self, doc: Document) {
        self.lock().users.push(doc);
    }

    /// Raw application record by id, for test assertions on persisted state.
    #[must_use]
    pub fn application(&self, id: &str) -> Option<Document> {
        self.lock()
            .applications
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
    }

    fn ordered_where(
        &self,
        operation: &'static str,
        table: Table,
        matches: impl Fn(&Document) -> bool,
    ) -> Result<Vec<Document>, DatastoreError> {
        let inner = self.lock();
        if inner.missing_index {
            return Err(DatastoreError::MissingIndex { operation });
        }
        let filtered = inner
            .table(table)
            .iter()
            .filter(|doc| matches(doc))
            .cloned()
            .collect();
        Ok(newest_first(filtered))
    }

    fn unordered_where(
        &self,
        table: Table,
        matches: impl Fn(&Document) -> bool,
    ) -> Vec<Document> {
        let inner = self.lock();
        inner
            .table(table)
            .iter()
            .filter(|doc| matches(doc))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<Document>, DatastoreError> {
        self.check_fail("list_events", "")?;
        Ok(newest_first(self.lock().events.clone()))
    }

    async fn list_events_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<Document>, DatastoreError> {
        self.check_fail("list_events_by_owner", owner_id)?;
        let by_owner = |doc: &Document| doc.str_field("ownerId") == Some(owner_id);
        match self.ordered_where("list_events_by_owner", Table::Events, by_owner) {
            Ok(docs) => Ok(docs),
            Err(DatastoreError::MissingIndex { operation }) => {
                warn!(operation, owner_id, "missing index, retrying without ordering");
                Ok(newest_first(self.unordered_where(Table::Events, by_owner)))
            }
            Err(other) => Err(other),
        }
    }

    async fn list_applications_by_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<Document>, DatastoreError> {
        self.check_fail("list_applications_by_event", event_id)?;
        Ok(self.unordered_where(Table::Applications, |doc| {
            doc.str_field("eventId") == Some(event_id)
        }))
    }

    async fn list_applications_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Document>, DatastoreError> {
        self.check_fail("list_applications_by_user", user_id)?;
        let by_user = |doc: &Document| doc.str_field("userId") == Some(user_id);
        match self.ordered_where("list_applications_by_user", Table::Applications, by_user) {
            Ok(docs) => Ok(docs),
            Err(DatastoreError::MissingIndex { operation }) => {
                warn!(operation, user_id, "missing index, retrying without ordering");
                Ok(newest_first(
                    self.unordered_where(Table::Applications, by_user),
                ))
            }
            Err(other) => Err(other),
        }
    }

    async fn get_event_by_id(&self, id: &str) -> Result<Option<Document>, DatastoreError> {
        self.check_fail("get_event_by_id", id)?;
        let found = self
            .lock()
            .events
            .iter()
            .find(|doc| doc.id == id)
            .cloned();
        if found.is_none() {
            debug!(id, "get_event_by_id: not found");
        }
        Ok(found)
    }

    async fn get_user_profile_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<Document>, DatastoreError> {
        if user_id.trim().is_empty() {
            warn!("get_user_profile_by_user_id: blank user id");
            return Ok(None);
        }
        self.check_fail("get_user_profile_by_user_id", user_id)?;
        let found = self
            .lock()
            .users
            .iter()
            .find(|doc| doc.str_field("id") == Some(user_id) || doc.id == user_id)
            .cloned();
        if found.is_none() {
            debug!(user_id, "get_user_profile_by_user_id: not found");
        }
        Ok(found)
    }

    async fn create_event(&self, event: NewEvent) -> Result<String, DatastoreError> {
        self.check_fail("create_event", &event.owner_id)?;
        let now = now_stamp();
        let mut data = json!({
            "name": event.name,
            "description": event.description,
            "venue": event.venue,
            "time": event.time.to_rfc3339_opts(SecondsFormat::Micros, true),
            "category": event.category,
            "ownerId": event.owner_id,
            "ownerName": event.owner_name,
            "createdAt": now,
            "updatedAt": now,
        });
        if let Some(sponsors) = event.sponsors {
            data["sponsors"] = Value::String(sponsors);
        }
        let mut inner = self.lock();
        let id = inner.fresh_id("evt");
        inner.events.push(Document::new(id.clone(), data));
        Ok(id)
    }

    async fn update_event(
        &self,
        id: &str,
        updates: EventUpdate,
    ) -> Result<(), DatastoreError> {
        self.check_fail("update_event", id)?;
        let mut inner = self.lock();
        let Some(doc) = inner.events.iter_mut().find(|doc| doc.id == id) else {
            return Err(DatastoreError::backend("update_event", id, "no such event"));
        };
        let fields = [
            ("name", updates.name),
            ("description", updates.description),
            ("venue", updates.venue),
            (
                "time",
                updates
                    .time
                    .map(|time| time.to_rfc3339_opts(SecondsFormat::Micros, true)),
            ),
            ("category", updates.category),
            ("sponsors", updates.sponsors),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                doc.data[field] = Value::String(value);
            }
        }
        doc.data["updatedAt"] = Value::String(now_stamp());
        Ok(())
    }

    async fn create_application(
        &self,
        application: NewApplication,
    ) -> Result<String, DatastoreError> {
        self.check_fail("create_application", &application.event_id)?;
        let data = json!({
            "eventId": application.event_id,
            "userId": application.user_id,
            "userName": application.user_name,
            "userEmail": application.user_email,
            "status": "pending",
            "createdAt": now_stamp(),
        });
        let mut inner = self.lock();
        let id = inner.fresh_id("app");
        inner.applications.push(Document::new(id.clone(), data));
        Ok(id)
    }

    async fn set_application_status(
        &self,
        id: &str,
        decision: Decision,
    ) -> Result<(), DatastoreError> {
        self.check_fail("set_application_status", id)?;
        let mut inner = self.lock();
        let Some(doc) = inner.applications.iter_mut().find(|doc| doc.id == id) else {
            return Err(DatastoreError::backend(
                "set_application_status",
                id,
                "no such application",
            ));
        };
        doc.data["status"] = Value::String(decision.status().as_str().to_owned());
        doc.data["updatedAt"] = Value::String(now_stamp());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Decision, NewApplication};

    fn event_doc(id: &str, owner: &str, created_at: &str) -> Document {
        Document::new(
            id,
            json!({
                "name": format!("event {id}"),
                "ownerId": owner,
                "createdAt": created_at,
            }),
        )
    }

    #[tokio::test]
    async fn owner_events_come_back_newest_first() {
        let store = MemoryStore::new();
        store.seed_event(event_doc("e-old", "owner-1", "2026-01-01T00:00:00Z"));
        store.seed_event(event_doc("e-new", "owner-1", "2026-03-01T00:00:00Z"));
        store.seed_event(event_doc("e-other", "owner-2", "2026-02-01T00:00:00Z"));

        let docs = store.list_events_by_owner("owner-1").await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, ["e-new", "e-old"]);
    }

    #[tokio::test]
    async fn missing_index_fallback_keeps_the_ordering() {
        let store = MemoryStore::new();
        store.seed_event(event_doc("e-old", "owner-1", "2026-01-01T00:00:00Z"));
        store.seed_event(event_doc("e-new", "owner-1", "2026-03-01T00:00:00Z"));
        store.simulate_missing_index();

        let docs = store.list_events_by_owner("owner-1").await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, ["e-new", "e-old"]);
    }

    #[tokio::test]
    async fn unknown_event_is_none_not_an_error() {
        let store = MemoryStore::new();
        assert!(store.get_event_by_id("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_user_id_short_circuits_the_profile_lookup() {
        let store = MemoryStore::new();
        assert!(store
            .get_user_profile_by_user_id("  ")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn new_applications_are_forced_to_pending() {
        let store = MemoryStore::new();
        let id = store
            .create_application(NewApplication {
                event_id: "e-1".to_owned(),
                user_id: "u-1".to_owned(),
                user_name: "Ada".to_owned(),
                user_email: "ada@example.com".to_owned(),
            })
            .await
            .unwrap();

        let doc = store.application(&id).unwrap();
        assert_eq!(doc.str_field("status"), Some("pending"));
        assert!(doc.str_field("createdAt").is_some());
    }

    #[tokio::test]
    async fn injected_failures_surface_as_backend_errors() {
        let store = MemoryStore::new();
        store.fail_on("get_event_by_id", "e-1");
        let err = store.get_event_by_id("e-1").await.unwrap_err();
        assert!(matches!(err, DatastoreError::Backend { .. }));
    }

    // The store performs no transition check on purpose; the workflow gate
    // is the only guard. This documents the gap.
    #[tokio::test]
    async fn store_accepts_a_second_decision_on_a_terminal_application() {
        let store = MemoryStore::new();
        store.seed_application(Document::new(
            "a-1",
            json!({ "eventId": "e-1", "userId": "u-1", "status": "declined" }),
        ));

        store
            .set_application_status("a-1", Decision::Approved)
            .await
            .unwrap();
        let doc = store.application("a-1").unwrap();
        assert_eq!(doc.str_field("status"), Some("approved"));
    }
}
