//! User-triggered mutations. Every action validates its identifiers
//! before touching the store, checks the caller's role or ownership, and
//! leaves refreshing to the caller: the dashboard refetches everything
//! after a successful mutation instead of patching local state.

use tracing::{error, info};
use volunteer_hub_datastore::models::{
    Application, Decision, EventUpdate, NewApplication, NewEvent, UserType,
};
use volunteer_hub_datastore::Datastore;

use crate::error::AppError;
use crate::normalize::normalize_event;
use crate::AuthContext;

/// Submits an application for the signed-in volunteer. Applicant name and
/// email are denormalized into the record so lists render without a
/// profile join. Returns the new application id; the store forces the
/// initial status to `pending`.
pub async fn apply_to_event(
    store: &dyn Datastore,
    auth: &AuthContext,
    event_id: &str,
) -> Result<String, AppError> {
    if event_id.trim().is_empty() {
        return Err(AppError::Validation(
            "an event id is required to apply".to_owned(),
        ));
    }
    if auth.user_id.trim().is_empty() {
        return Err(AppError::Validation(
            "cannot apply without a signed-in user".to_owned(),
        ));
    }
    if auth.user_type != UserType::Volunteer {
        return Err(AppError::Unauthorized(
            "Only volunteers can apply to events".to_owned(),
        ));
    }

    let id = store
        .create_application(NewApplication {
            event_id: event_id.to_owned(),
            user_id: auth.user_id.clone(),
            user_name: auth.applicant_name(),
            user_email: auth.email.clone(),
        })
        .await
        .inspect_err(|err| error!(event_id, %err, "create_application failed"))?;
    info!(event_id, application_id = %id, "application submitted");
    Ok(id)
}

/// The status transition gate. Only the owner of the referenced event may
/// decide an application, and only out of `pending`; both failures leave
/// the store untouched. On success the caller must refresh its views.
///
/// The terminal-state check lives here and only here: the store itself
/// still applies whatever status it is handed, and the write is
/// last-writer-wins with no version check, so two tabs deciding the same
/// application concurrently remain a real race.
pub async fn decide_application(
    store: &dyn Datastore,
    auth: &AuthContext,
    application: &Application,
    decision: Decision,
) -> Result<(), AppError> {
    if application.id.trim().is_empty() {
        return Err(AppError::Validation(
            "an application id is required".to_owned(),
        ));
    }
    if application.status.is_terminal() {
        return Err(AppError::AlreadyDecided {
            id: application.id.clone(),
            status: application.status.as_str(),
        });
    }

    let Some(event_doc) = store.get_event_by_id(&application.event_id).await? else {
        return Err(AppError::Validation(format!(
            "application {} references event {} which no longer exists",
            application.id, application.event_id
        )));
    };
    let event = normalize_event(&event_doc);
    if event.owner_id != auth.user_id {
        return Err(AppError::Unauthorized(
            "only the event owner can decide applications".to_owned(),
        ));
    }

    store
        .set_application_status(&application.id, decision)
        .await
        .inspect_err(
            |err| error!(application_id = %application.id, %err, "set_application_status failed"),
        )?;
    info!(
        application_id = %application.id,
        event_id = %application.event_id,
        status = decision.status().as_str(),
        "application decided"
    );
    Ok(())
}

/// Creates an event owned by the signed-in user. The owner fields of the
/// payload are always taken from the auth context, never from the caller.
pub async fn create_event(
    store: &dyn Datastore,
    auth: &AuthContext,
    mut event: NewEvent,
) -> Result<String, AppError> {
    if auth.user_type != UserType::EventOwner {
        return Err(AppError::Unauthorized(
            "Only event owners can create events".to_owned(),
        ));
    }
    if event.name.trim().is_empty() || event.description.trim().is_empty() {
        return Err(AppError::Validation(
            "an event needs a name and a description".to_owned(),
        ));
    }
    event.owner_id = auth.user_id.clone();
    event.owner_name = auth.display_name.clone();

    let id = store
        .create_event(event)
        .await
        .inspect_err(|err| error!(%err, "create_event failed"))?;
    info!(event_id = %id, owner_id = %auth.user_id, "event created");
    Ok(id)
}

/// Applies a partial update to an event the signed-in user owns.
pub async fn update_event(
    store: &dyn Datastore,
    auth: &AuthContext,
    event_id: &str,
    updates: EventUpdate,
) -> Result<(), AppError> {
    if event_id.trim().is_empty() {
        return Err(AppError::Validation("an event id is required".to_owned()));
    }
    let Some(event_doc) = store.get_event_by_id(event_id).await? else {
        return Err(AppError::Validation(format!(
            "event {event_id} does not exist"
        )));
    };
    if normalize_event(&event_doc).owner_id != auth.user_id {
        return Err(AppError::Unauthorized(
            "only the event owner can update an event".to_owned(),
        ));
    }
    store.update_event(event_id, updates).await?;
    info!(event_id, "event updated");
    Ok(())
}
