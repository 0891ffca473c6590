//! Listing filters shared by the public listing pages and the admin panel.
//!
//! A [`FilterState`] is updated through [`FilterPatch`]es and then either
//! evaluated locally with [`filter_properties`] or turned into server query
//! parameters with [`QueryBuilder`].

mod predicate;
mod price;
mod query;
mod state;

pub use predicate::{filter_properties, paginate};
pub use price::{index_of_current, range_at, selected_index, PriceRange, PRICE_RANGES};
pub use query::{QueryBuilder, QueryParams, ADMIN_PAGE_LIMIT, DEFAULT_PAGE_LIMIT};
pub use state::{FilterPatch, FilterState};

use crate::models::UnknownVariant;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("minimum price {min} is above maximum price {max}")]
    InvertedPriceRange { min: u64, max: u64 },

    #[error("unknown filter key: {0}")]
    UnknownKey(String),

    #[error("invalid value {value:?} for filter {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
}
