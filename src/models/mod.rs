mod area;
mod envelope;
mod property;
mod user;

pub use area::{known_areas, Area, AreaForm, AreaImage};
pub use envelope::{is_envelope, Envelope, Paginated};
pub use property::{Category, Property, PropertyDraft, PropertyType, Status};
pub use user::{AuthPayload, AuthTokens, Favorite, Inquiry, InquiryStatus, NewInquiry, User};

use thiserror::Error;

/// Raised when a string does not name a variant of one of the closed enumerations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
