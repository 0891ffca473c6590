use super::price::range_at;
use super::FilterError;
use crate::models::{Category, PropertyType};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Active listing constraints. `None` means no constraint on that dimension.
///
/// Deserializing goes through [`FilterState::apply`], so empty values are
/// dropped and inverted price bounds are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawFilterState")]
pub struct FilterState {
    /// Area slug
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFilterState {
    area: Option<String>,
    category: Option<Category>,
    property_type: Option<PropertyType>,
    min_price: Option<u64>,
    max_price: Option<u64>,
    page: Option<u32>,
    limit: Option<u32>,
}

impl TryFrom<RawFilterState> for FilterState {
    type Error = FilterError;

    fn try_from(raw: RawFilterState) -> Result<Self, Self::Error> {
        let state = FilterState::default().apply_all([
            FilterPatch::Area(raw.area),
            FilterPatch::Category(raw.category),
            FilterPatch::PropertyType(raw.property_type),
            FilterPatch::MinPrice(raw.min_price),
            FilterPatch::MaxPrice(raw.max_price),
            FilterPatch::Page(raw.page),
            FilterPatch::Limit(raw.limit),
        ]);
        state.validate()?;
        Ok(state)
    }
}

/// A single user action on the filter bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPatch {
    Area(Option<String>),
    Category(Option<Category>),
    PropertyType(Option<PropertyType>),
    MinPrice(Option<u64>),
    MaxPrice(Option<u64>),
    Page(Option<u32>),
    Limit(Option<u32>),
    /// Row of the price range table; sets both bounds at once
    PriceBracket(usize),
    Clear,
}

impl FilterPatch {
    /// Build a patch from the raw key/value pair a select control emits.
    /// Empty values produce a patch that removes the key.
    pub fn parse(key: &str, raw: &str) -> Result<Self, FilterError> {
        let value = raw.trim();
        let present = !value.is_empty();

        let patch = match key {
            "area" => FilterPatch::Area(present.then(|| value.to_string())),
            "category" => FilterPatch::Category(present.then(|| value.parse()).transpose()?),
            "propertyType" => {
                FilterPatch::PropertyType(present.then(|| value.parse()).transpose()?)
            }
            "minPrice" => FilterPatch::MinPrice(parse_number("minPrice", value)?),
            "maxPrice" => FilterPatch::MaxPrice(parse_number("maxPrice", value)?),
            "page" => FilterPatch::Page(parse_number("page", value)?),
            "limit" => FilterPatch::Limit(parse_number("limit", value)?),
            "priceRange" => FilterPatch::PriceBracket(
                parse_number("priceRange", value)?.unwrap_or_default(),
            ),
            other => return Err(FilterError::UnknownKey(other.to_string())),
        };

        Ok(patch)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<Option<T>, FilterError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| FilterError::InvalidValue {
            key,
            value: value.to_string(),
        })
}

fn non_zero_u64(v: Option<u64>) -> Option<u64> {
    v.filter(|n| *n != 0)
}

fn non_zero_u32(v: Option<u32>) -> Option<u32> {
    v.filter(|n| *n != 0)
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next state; `self` is left untouched.
    pub fn apply(&self, patch: FilterPatch) -> FilterState {
        let mut next = self.clone();

        match patch {
            FilterPatch::Area(v) => {
                next.area = v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
            }
            FilterPatch::Category(v) => next.category = v,
            FilterPatch::PropertyType(v) => next.property_type = v,
            FilterPatch::MinPrice(v) => next.min_price = non_zero_u64(v),
            FilterPatch::MaxPrice(v) => next.max_price = non_zero_u64(v),
            FilterPatch::Page(v) => next.page = non_zero_u32(v),
            FilterPatch::Limit(v) => next.limit = non_zero_u32(v),
            FilterPatch::PriceBracket(index) => {
                let (min, max) = match range_at(index) {
                    Some(range) => (range.min, range.max),
                    None => {
                        warn!("Price bracket {} out of range, clearing price bounds", index);
                        (None, None)
                    }
                };
                next.min_price = non_zero_u64(min);
                next.max_price = non_zero_u64(max);
            }
            FilterPatch::Clear => next = FilterState::default(),
        }

        next
    }

    /// Apply several patches in order
    pub fn apply_all<I>(&self, patches: I) -> FilterState
    where
        I: IntoIterator<Item = FilterPatch>,
    {
        patches
            .into_iter()
            .fold(self.clone(), |state, patch| state.apply(patch))
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of keys currently set (the badge on the filter bar)
    pub fn active_count(&self) -> usize {
        [
            self.area.is_some(),
            self.category.is_some(),
            self.property_type.is_some(),
            self.min_price.is_some(),
            self.max_price.is_some(),
            self.page.is_some(),
            self.limit.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Reject states whose price bounds are inverted
    pub fn validate(&self) -> Result<(), FilterError> {
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) if min > max => Err(FilterError::InvertedPriceRange { min, max }),
            _ => Ok(()),
        }
    }

    /// Same state with inverted price bounds swapped
    pub fn normalized(&self) -> FilterState {
        let mut next = self.clone();
        if let (Some(min), Some(max)) = (next.min_price, next.max_price) {
            if min > max {
                next.min_price = Some(max);
                next.max_price = Some(min);
            }
        }
        next
    }
}
