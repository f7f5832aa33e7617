use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval workflow state of an [`Application`].
///
/// `Pending` is the only state with outgoing transitions; `Approved` and
/// `Declined` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Declined,
}

impl ApplicationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Declined)
    }

    /// Unknown or absent status strings are treated as `pending`, matching
    /// how records written before the status field existed are displayed.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some("approved") => Self::Approved,
            Some("declined") => Self::Declined,
            _ => Self::Pending,
        }
    }
}

/// The only two targets a status write accepts. `pending` is set by the
/// store at creation and can never be written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Declined,
}

impl Decision {
    #[must_use]
    pub const fn status(self) -> ApplicationStatus {
        match self {
            Self::Approved => ApplicationStatus::Approved,
            Self::Declined => ApplicationStatus::Declined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserType {
    Volunteer,
    EventOwner,
}

/// Canonical event shape. Produced by the workflow's normalizer; every
/// display field is already filled with its fallback when the stored
/// record was missing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub venue: String,
    pub time: Option<DateTime<Utc>>,
    pub category: String,
    pub sponsors: Option<String>,
    pub owner_id: String,
    pub owner_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Canonical application shape. `event_name` starts as whatever was
/// denormalized into the record at creation time and is overwritten by
/// enrichment when the referenced event can be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub status: ApplicationStatus,
    pub event_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub country: String,
    pub user_type: Option<UserType>,
    pub bio: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for event creation; the store assigns the id and stamps
/// `createdAt`/`updatedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub venue: String,
    pub time: DateTime<Utc>,
    pub category: String,
    pub sponsors: Option<String>,
    pub owner_id: String,
    pub owner_name: String,
}

/// Partial event update; `None` fields are left untouched. The store
/// re-stamps `updatedAt` on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub sponsors: Option<String>,
}

/// Payload for a volunteer's application. Applicant name and email are
/// denormalized here so dashboards can render without a profile join.
/// The store forces the initial status to `pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplication {
    pub event_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
}
