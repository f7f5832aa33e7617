//! Joins applications to the events they reference.

use std::collections::HashMap;

use volunteer_hub_datastore::models::{Application, Event};

use crate::normalize::UNKNOWN_EVENT;

/// The event name an application displays: the enriched name when set,
/// the literal fallback otherwise.
#[must_use]
pub fn resolved_event_name(application: &Application) -> &str {
    application.event_name.as_deref().unwrap_or(UNKNOWN_EVENT)
}

/// Fills `event_name` on every application. Resolution order: the found
/// event's canonical name, then any name embedded in the application at
/// creation time, then "Unknown Event". Pure over its inputs, so running
/// it twice on the same data yields the same list.
#[must_use]
pub fn enrich_applications(
    applications: Vec<Application>,
    events: &HashMap<String, Option<Event>>,
) -> Vec<Application> {
    applications
        .into_iter()
        .map(|mut application| {
            let resolved = events
                .get(&application.event_id)
                .and_then(Option::as_ref)
                .map(|event| event.name.clone())
                .or_else(|| application.event_name.clone())
                .unwrap_or_else(|| UNKNOWN_EVENT.to_owned());
            application.event_name = Some(resolved);
            application
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use volunteer_hub_datastore::Document;

    use super::*;
    use crate::normalize::{normalize_application, normalize_event};

    fn application(id: &str, event_id: &str, embedded_name: Option<&str>) -> Application {
        let mut data = json!({ "eventId": event_id });
        if let Some(name) = embedded_name {
            data["eventName"] = json!(name);
        }
        normalize_application(&Document::new(id, data))
    }

    fn found(name: &str) -> Option<Event> {
        Some(normalize_event(&Document::new("e", json!({ "name": name }))))
    }

    #[test]
    fn names_resolve_in_order_found_then_embedded_then_fallback() {
        let mut events = HashMap::new();
        events.insert("e-1".to_owned(), found("Beach Cleanup"));
        events.insert("e-2".to_owned(), None);

        let enriched = enrich_applications(
            vec![
                application("a-1", "e-1", Some("stale name")),
                application("a-2", "e-2", Some("Embedded Name")),
                application("a-3", "missing", None),
            ],
            &events,
        );

        assert_eq!(enriched[0].event_name.as_deref(), Some("Beach Cleanup"));
        assert_eq!(enriched[1].event_name.as_deref(), Some("Embedded Name"));
        assert_eq!(enriched[2].event_name.as_deref(), Some(UNKNOWN_EVENT));
    }

    #[test]
    fn enrichment_is_idempotent() {
        let mut events = HashMap::new();
        events.insert("e-1".to_owned(), found("Beach Cleanup"));

        let input = vec![
            application("a-1", "e-1", None),
            application("a-2", "missing", None),
        ];
        let once = enrich_applications(input.clone(), &events);
        let twice = enrich_applications(once.clone(), &events);
        assert_eq!(once, twice);
    }
}
