//! Dashboard refresh cycles. Each refresh builds a complete, consistent
//! snapshot from scratch and the caller swaps it in atomically; nothing
//! is patched incrementally, and a snapshot from a superseded refresh is
//! discarded on arrival (see [`ViewState`]).

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::DateTime;
use futures_util::future::join_all;
use tracing::{debug, error};
use volunteer_hub_datastore::models::{Application, ApplicationStatus, Event, UserProfile};
use volunteer_hub_datastore::Datastore;

use crate::enrich::enrich_applications;
use crate::error::AppError;
use crate::lookup::event_lookup;
use crate::normalize::{normalize_application, normalize_event, normalize_profile};
use crate::AuthContext;

/// Snapshot backing the event-owner dashboard: the owner's events, how
/// many applications each has, and every application across those events
/// enriched and sorted newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerDashboard {
    pub events: Vec<Event>,
    pub application_counts: HashMap<String, usize>,
    pub applications: Vec<Application>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplicationStats {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
}

/// Snapshot backing the volunteer dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct VolunteerDashboard {
    pub applications: Vec<Application>,
    pub stats: ApplicationStats,
}

fn stats(applications: &[Application]) -> ApplicationStats {
    ApplicationStats {
        total: applications.len(),
        approved: applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Approved)
            .count(),
        pending: applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .count(),
    }
}

/// Stable newest-first; rows without a creation time sort last, ties keep
/// their relative order.
fn sort_newest_first(applications: &mut [Application]) {
    applications
        .sort_by_key(|application| Reverse(application.created_at.unwrap_or(DateTime::UNIX_EPOCH)));
}

/// Owner refresh: the bulk event list failing aborts the whole view with
/// a retryable error, but a failing per-event application fetch only logs
/// and contributes an empty list.
pub async fn refresh_owner(
    store: &dyn Datastore,
    auth: &AuthContext,
) -> Result<OwnerDashboard, AppError> {
    let event_docs = store.list_events_by_owner(&auth.user_id).await?;
    let events: Vec<Event> = event_docs.iter().map(normalize_event).collect();

    let fetches = events.iter().map(|event| async {
        let applications = match store.list_applications_by_event(&event.id).await {
            Ok(docs) => docs.iter().map(normalize_application).collect(),
            Err(err) => {
                error!(event_id = %event.id, %err, "list_applications_by_event failed");
                Vec::new()
            }
        };
        (event.id.clone(), applications)
    });
    let per_event: Vec<(String, Vec<Application>)> = join_all(fetches).await;

    let application_counts = per_event
        .iter()
        .map(|(event_id, applications)| (event_id.clone(), applications.len()))
        .collect();

    // The owner's own event list already holds every event the
    // applications can reference; no per-id lookups needed here.
    let own_events: HashMap<String, Option<Event>> = events
        .iter()
        .map(|event| (event.id.clone(), Some(event.clone())))
        .collect();
    let flattened = per_event
        .into_iter()
        .flat_map(|(event_id, applications)| {
            applications.into_iter().map(move |mut application| {
                application.event_id.clone_from(&event_id);
                application
            })
        })
        .collect();
    let mut applications = enrich_applications(flattened, &own_events);
    sort_newest_first(&mut applications);

    Ok(OwnerDashboard {
        events,
        application_counts,
        applications,
    })
}

/// Volunteer refresh: bulk application list, then the referenced events
/// through the per-refresh lookup, then enrichment.
pub async fn refresh_volunteer(
    store: &dyn Datastore,
    auth: &AuthContext,
) -> Result<VolunteerDashboard, AppError> {
    let docs = store.list_applications_by_user(&auth.user_id).await?;
    let applications: Vec<Application> = docs.iter().map(normalize_application).collect();

    let referenced = applications
        .iter()
        .map(|application| application.event_id.clone());
    let events = event_lookup(store, referenced).await;
    let applications = enrich_applications(applications, &events);

    Ok(VolunteerDashboard {
        stats: stats(&applications),
        applications,
    })
}

/// Detail view for one applicant. A missing user id is rejected before
/// any backend call; a failed or empty profile fetch degrades to `None`
/// rather than failing the view.
pub async fn volunteer_profile(
    store: &dyn Datastore,
    application: &Application,
) -> Result<Option<UserProfile>, AppError> {
    let user_id = application.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation(format!(
            "application {} carries no user id",
            application.id
        )));
    }
    match store.get_user_profile_by_user_id(user_id).await {
        Ok(found) => Ok(found.map(|doc| normalize_profile(&doc))),
        Err(err) => {
            error!(user_id, %err, "get_user_profile_by_user_id failed");
            Ok(None)
        }
    }
}

/// Token handed out when a refresh starts; only the newest token can
/// publish its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshToken(u64);

/// Holder for the currently displayed snapshot. Backend calls cannot be
/// cancelled, so a refresh that was superseded (or whose view went away)
/// still runs to completion; its result is dropped at [`Self::install`]
/// instead of overwriting newer state.
#[derive(Debug)]
pub struct ViewState<T> {
    epoch: AtomicU64,
    value: Mutex<Option<Arc<T>>>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewState<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            epoch: AtomicU64::new(0),
            value: Mutex::new(None),
        }
    }

    /// Starts a refresh cycle, invalidating any still-running one.
    pub fn begin(&self) -> RefreshToken {
        RefreshToken(self.epoch.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Drops any in-flight refresh's right to publish, e.g. when the view
    /// goes away.
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Publishes `value` if `token` still belongs to the newest refresh.
    /// Returns whether the snapshot was installed.
    pub fn install(&self, token: RefreshToken, value: T) -> bool {
        if self.epoch.load(Ordering::SeqCst) != token.0 {
            debug!(token = token.0, "discarding stale refresh result");
            return false;
        }
        *self.value.lock().expect("view state lock poisoned") = Some(Arc::new(value));
        true
    }

    #[must_use]
    pub fn current(&self) -> Option<Arc<T>> {
        self.value.lock().expect("view state lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_superseded_refresh_cannot_publish() {
        let state = ViewState::new();
        let first = state.begin();
        let second = state.begin();

        assert!(!state.install(first, "stale"));
        assert!(state.current().is_none());
        assert!(state.install(second, "fresh"));
        assert_eq!(state.current().as_deref(), Some(&"fresh"));
    }

    #[test]
    fn invalidation_discards_the_in_flight_refresh() {
        let state = ViewState::new();
        let token = state.begin();
        state.invalidate();
        assert!(!state.install(token, "late"));
        assert!(state.current().is_none());
    }
}
