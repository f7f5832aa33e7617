//! The public event browse page: list everything, search, and remember
//! which events the signed-in volunteer already applied to.

use std::collections::HashSet;

use serde_json::Value;
use tracing::error;
use volunteer_hub_datastore::models::Event;
use volunteer_hub_datastore::{Datastore, Document};

use crate::error::AppError;
use crate::normalize::{normalize_event, resolve_event_id};

pub const CATEGORIES: [&str; 6] = [
    "Environment",
    "Education",
    "Community",
    "Healthcare",
    "Social Services",
    "Arts & Culture",
];

fn has_str(doc: &Document, field: &str) -> bool {
    doc.str_field(field).is_some_and(|value| !value.is_empty())
}

/// Records missing any field the browse cards need are dropped rather
/// than rendered half-empty. Legacy-named records fail this check too,
/// matching the original behavior.
fn browseable(doc: &Document) -> bool {
    !doc.id.is_empty()
        && has_str(doc, "name")
        && has_str(doc, "description")
        && has_str(doc, "venue")
        && doc.data.get("time").is_some_and(|value| !matches!(value, Value::Null))
}

/// All browseable events, newest first. A bulk fetch failure aborts the
/// view with a retryable error.
pub async fn browse_events(store: &dyn Datastore) -> Result<Vec<Event>, AppError> {
    let docs = store.list_events().await?;
    Ok(docs
        .iter()
        .filter(|doc| browseable(doc))
        .map(normalize_event)
        .collect())
}

/// Ids of the events the user already applied to, so the apply control
/// can stay disabled. Errors degrade to an empty set.
pub async fn applied_event_ids(store: &dyn Datastore, user_id: &str) -> HashSet<String> {
    match store.list_applications_by_user(user_id).await {
        Ok(docs) => docs
            .iter()
            .filter_map(|doc| resolve_event_id(&doc.data))
            .collect(),
        Err(err) => {
            error!(user_id, %err, "list_applications_by_user failed");
            HashSet::new()
        }
    }
}

/// Search term plus category restriction. `category: None` is the "all"
/// wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSearch {
    pub term: String,
    pub category: Option<String>,
}

impl EventSearch {
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        let term_ok = if self.term.is_empty() {
            true
        } else {
            let needle = self.term.to_lowercase();
            event.name.to_lowercase().contains(&needle)
                || event.description.to_lowercase().contains(&needle)
                || event.venue.to_lowercase().contains(&needle)
        };
        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|category| &event.category == category);
        term_ok && category_ok
    }

    #[must_use]
    pub fn filter(&self, events: &[Event]) -> Vec<Event> {
        events
            .iter()
            .filter(|event| self.matches(event))
            .cloned()
            .collect()
    }
}
