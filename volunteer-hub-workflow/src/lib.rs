//! The application/volunteer matching workflow: event owners post
//! events, volunteers apply, owners approve or decline. All persistence
//! sits behind the injected [`Datastore`] interface; this crate owns the
//! client-side data shaping (normalization, lookup, enrichment), the
//! status transition gate, and the filter/paginate view model.

pub mod actions;
pub mod browse;
pub mod dashboard;
pub mod enrich;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod view;

pub use error::AppError;
use volunteer_hub_datastore::models::UserType;
pub use volunteer_hub_datastore::Datastore;

/// The signed-in identity, passed explicitly into every workflow entry
/// point. There is no ambient session state to consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub user_type: UserType,
}

impl AuthContext {
    /// The name denormalized into a new application: the display name,
    /// the email when the profile has no name, "Anonymous" as a last
    /// resort.
    #[must_use]
    pub fn applicant_name(&self) -> String {
        if !self.display_name.trim().is_empty() {
            self.display_name.clone()
        } else if !self.email.trim().is_empty() {
            self.email.clone()
        } else {
            "Anonymous".to_owned()
        }
    }
}
