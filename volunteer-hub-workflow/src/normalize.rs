//! Boundary between the store's heterogeneous record shapes and the
//! canonical model. Records written by older client versions name their
//! fields differently (`title` for `name`, `location` for `venue`,
//! `uid` for `userId`, dates as strings, epoch numbers or native
//! timestamp objects); everything is reconciled here and nothing past
//! this module sees a raw document. Absent data is a display gap, never
//! an error: these functions cannot fail.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use volunteer_hub_datastore::models::{Application, ApplicationStatus, Event, UserProfile, UserType};
use volunteer_hub_datastore::Document;

pub const UNTITLED_EVENT: &str = "Untitled Event";
pub const UNKNOWN_EVENT: &str = "Unknown Event";
pub const LOCATION_TBD: &str = "Location TBD";
pub const DATE_TBD: &str = "Date TBD";
pub const DEFAULT_CATEGORY: &str = "General";

fn first_str(data: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| data.get(*name).and_then(Value::as_str))
        .map(ToOwned::to_owned)
}

fn str_or(data: &Value, names: &[&str], fallback: &str) -> String {
    first_str(data, names).unwrap_or_else(|| fallback.to_owned())
}

/// Converts the three date shapes found in stored records to the one
/// canonical representation. Numeric epochs below `1e12` in magnitude are
/// taken as seconds, larger ones as milliseconds. Anything unparseable
/// becomes `None`.
pub fn coerce_date(value: Option<&Value>) -> Option<DateTime<Utc>> {
    const MILLIS_CUTOVER: i64 = 100_000_000_000;
    match value? {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        Value::Number(number) => {
            #[allow(clippy::cast_possible_truncation)]
            let epoch = match number.as_i64() {
                Some(int) => int,
                None => number.as_f64()? as i64,
            };
            if epoch.abs() < MILLIS_CUTOVER {
                Utc.timestamp_opt(epoch, 0).single()
            } else {
                Utc.timestamp_millis_opt(epoch).single()
            }
        }
        Value::Object(map) => {
            let seconds = map.get("seconds").and_then(Value::as_i64)?;
            let nanos = map.get("nanoseconds").and_then(Value::as_u64).unwrap_or(0);
            #[allow(clippy::cast_possible_truncation)]
            Utc.timestamp_opt(seconds, nanos as u32).single()
        }
        _ => None,
    }
}

/// The application's referenced event id may be stored directly, as an
/// embedded string under `event`, or nested in an embedded event object.
pub fn resolve_event_id(data: &Value) -> Option<String> {
    first_str(data, &["eventId"])
        .or_else(|| match data.get("event") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Object(embedded)) => embedded
                .get("id")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
            _ => None,
        })
        .filter(|id| !id.is_empty())
}

pub fn normalize_event(doc: &Document) -> Event {
    let data = &doc.data;
    Event {
        id: doc.id.clone(),
        name: str_or(data, &["name", "title"], UNTITLED_EVENT),
        description: str_or(data, &["description"], ""),
        venue: str_or(data, &["venue", "location"], LOCATION_TBD),
        time: coerce_date(data.get("time")).or_else(|| coerce_date(data.get("date"))),
        category: str_or(data, &["category"], DEFAULT_CATEGORY),
        sponsors: first_str(data, &["sponsors"]),
        owner_id: str_or(data, &["ownerId"], ""),
        owner_name: str_or(data, &["ownerName"], ""),
        created_at: coerce_date(data.get("createdAt")),
        updated_at: coerce_date(data.get("updatedAt")),
    }
}

pub fn normalize_application(doc: &Document) -> Application {
    let data = &doc.data;
    Application {
        id: doc.id.clone(),
        event_id: resolve_event_id(data).unwrap_or_default(),
        user_id: str_or(data, &["userId", "uid"], ""),
        user_name: str_or(data, &["userName", "userDisplayName"], ""),
        user_email: str_or(data, &["userEmail"], ""),
        status: ApplicationStatus::parse_lenient(
            data.get("status").and_then(Value::as_str),
        ),
        event_name: first_str(data, &["eventName"]),
        created_at: coerce_date(data.get("createdAt")),
        updated_at: coerce_date(data.get("updatedAt")),
    }
}

pub fn normalize_profile(doc: &Document) -> UserProfile {
    let data = &doc.data;
    UserProfile {
        id: str_or(data, &["id"], &doc.id),
        full_name: str_or(data, &["fullName", "displayName"], ""),
        username: str_or(data, &["username"], ""),
        email: str_or(data, &["email"], ""),
        country: str_or(data, &["country", "location"], ""),
        user_type: match data.get("userType").and_then(Value::as_str) {
            Some("volunteer") => Some(UserType::Volunteer),
            Some("event-owner") => Some(UserType::EventOwner),
            _ => None,
        },
        bio: first_str(data, &["bio", "description"]),
        created_at: coerce_date(data.get("createdAt")),
        updated_at: coerce_date(data.get("updatedAt")),
    }
}

/// Display label for an event's scheduled time.
#[must_use]
pub fn event_date_label(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || DATE_TBD.to_owned(),
        |time| time.format("%B %-d, %Y").to_string(),
    )
}

/// Display label for an application's creation time.
#[must_use]
pub fn applied_date_label(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || "Unknown date".to_owned(),
        |time| time.format("%B %-d, %Y").to_string(),
    )
}
