//! Per-refresh lookup of the events referenced by a list of applications.

use std::collections::{HashMap, HashSet};

use futures_util::future::join_all;
use tracing::warn;
use volunteer_hub_datastore::models::Event;
use volunteer_hub_datastore::Datastore;

use crate::normalize::normalize_event;

/// Fetches every distinct id at most once, all lookups in flight
/// concurrently, and returns only after each one has settled. A failed or
/// not-found fetch maps the id to `None` and never aborts the rest of the
/// batch. The mapping is rebuilt from scratch on every call; nothing is
/// cached across refreshes.
pub async fn event_lookup(
    store: &dyn Datastore,
    ids: impl IntoIterator<Item = String>,
) -> HashMap<String, Option<Event>> {
    let unique: HashSet<String> = ids.into_iter().filter(|id| !id.is_empty()).collect();
    let fetches = unique.into_iter().map(|id| async move {
        let event = match store.get_event_by_id(&id).await {
            Ok(found) => found.map(|doc| normalize_event(&doc)),
            Err(error) => {
                warn!(event_id = %id, %error, "get_event_by_id failed, name will fall back");
                None
            }
        };
        (id, event)
    });
    join_all(fetches).await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use volunteer_hub_datastore::memory::MemoryStore;
    use volunteer_hub_datastore::Document;

    use super::*;

    #[tokio::test]
    async fn duplicate_ids_collapse_and_misses_map_to_none() {
        let store = MemoryStore::new();
        store.seed_event(Document::new("e-1", json!({ "name": "Tree Planting" })));

        let ids = ["e-1", "e-1", "ghost", ""].map(str::to_owned);
        let map = event_lookup(&store, ids).await;

        assert_eq!(map.len(), 2);
        assert_eq!(
            map["e-1"].as_ref().map(|event| event.name.as_str()),
            Some("Tree Planting")
        );
        assert!(map["ghost"].is_none());
    }

    #[tokio::test]
    async fn one_failing_fetch_does_not_abort_the_batch() {
        let store = MemoryStore::new();
        store.seed_event(Document::new("e-1", json!({ "name": "Tree Planting" })));
        store.seed_event(Document::new("e-2", json!({ "name": "Food Drive" })));
        store.fail_on("get_event_by_id", "e-2");

        let map = event_lookup(&store, ["e-1", "e-2"].map(str::to_owned)).await;

        assert!(map["e-1"].is_some());
        assert!(map["e-2"].is_none());
    }
}
