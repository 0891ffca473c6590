use super::FilterState;
use std::fmt;

/// Page size of the public listing pages
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
/// Page size of the admin property table
pub const ADMIN_PAGE_LIMIT: u32 = 100;

/// Ordered query parameters for `GET /properties`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn page(&self) -> u32 {
        self.get("page").and_then(|v| v.parse().ok()).unwrap_or(1)
    }

    pub fn limit(&self) -> u32 {
        self.get("limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// Turns a [`FilterState`] into server query parameters
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    pub default_limit: u32,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl QueryBuilder {
    pub fn new(default_limit: u32) -> Self {
        Self { default_limit }
    }

    pub fn admin() -> Self {
        Self::new(ADMIN_PAGE_LIMIT)
    }

    pub fn build(&self, filters: &FilterState) -> QueryParams {
        let mut pairs = vec![
            ("page", filters.page.unwrap_or(1).to_string()),
            (
                "limit",
                filters.limit.unwrap_or(self.default_limit).to_string(),
            ),
        ];

        let optional = [
            ("area", filters.area.clone()),
            ("category", filters.category.map(|c| c.to_string())),
            ("propertyType", filters.property_type.map(|t| t.to_string())),
            ("minPrice", filters.min_price.map(|n| n.to_string())),
            ("maxPrice", filters.max_price.map(|n| n.to_string())),
        ];

        pairs.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v))),
        );

        QueryParams { pairs }
    }
}
