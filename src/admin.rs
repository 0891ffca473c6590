//! Numbers and lookups behind the admin dashboard and the property table.

use crate::format::format_price;
use crate::models::{Category, Property};
use std::cmp::Reverse;

/// How many listings the dashboard shows under "recent"
pub const RECENT_LISTINGS: usize = 3;

/// Dashboard summary of the whole portfolio
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioStats {
    pub total_properties: usize,
    /// Listings whose status is `Available`
    pub active_listings: usize,
    /// Sum of asking prices of `Sale` listings
    pub portfolio_value: u64,
    pub recent: Vec<Property>,
}

impl PortfolioStats {
    pub fn from_properties(properties: &[Property]) -> Self {
        Self {
            total_properties: properties.len(),
            active_listings: properties.iter().filter(|p| p.is_available()).count(),
            portfolio_value: properties
                .iter()
                .filter(|p| p.category == Category::Sale)
                .map(|p| p.price)
                .fold(0u64, u64::saturating_add),
            recent: recent_listings(properties, RECENT_LISTINGS),
        }
    }

    /// Whole millions, e.g. `₦456M+`
    pub fn portfolio_value_label(&self) -> String {
        format!(
            "{}M+",
            format_price((self.portfolio_value + 500_000) / 1_000_000)
        )
    }
}

/// Newest first; listings without a creation date sort last.
pub fn recent_listings(properties: &[Property], count: usize) -> Vec<Property> {
    let mut sorted: Vec<&Property> = properties.iter().collect();
    sorted.sort_by_key(|p| Reverse(p.created_at));
    sorted.into_iter().take(count).cloned().collect()
}

/// Case-insensitive match on title or address. A blank term matches everything.
pub fn search_properties(properties: &[Property], term: &str) -> Vec<Property> {
    let needle = term.trim().to_lowercase();
    properties
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.title.to_lowercase().contains(&needle)
                || p.address.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn portfolio() -> Vec<Property> {
        serde_json::from_value(json!([
            {"id": "1", "title": "Lakeview Duplex", "slug": "lakeview-duplex", "category": "Sale",
             "propertyType": "Duplex", "areaSlug": "jabi", "price": 85000000,
             "address": "12 Obafemi Awolowo Way", "createdAt": "2024-02-01"},
            {"id": "2", "title": "Studio Apartment", "slug": "studio", "category": "Rent",
             "propertyType": "Self-Contain", "areaSlug": "lugbe", "price": 450000,
             "address": "Airport Road", "createdAt": "2024-03-10", "status": "Unavailable"},
            {"id": "3", "title": "Corner Plot", "slug": "corner-plot", "category": "Sale",
             "propertyType": "Land", "areaSlug": "katampe", "price": 30000000,
             "status": "Sold"},
            {"id": "4", "title": "Family Terrace", "slug": "family-terrace", "category": "Sale",
             "propertyType": "Terrace", "areaSlug": "gwarinpa", "price": 55000000,
             "address": "3rd Avenue", "createdAt": "2024-01-05T09:30:00Z"}
        ]))
        .unwrap()
    }

    #[test]
    fn summarises_the_portfolio() {
        let stats = PortfolioStats::from_properties(&portfolio());

        assert_eq!(stats.total_properties, 4);
        assert_eq!(stats.active_listings, 2);
        assert_eq!(stats.portfolio_value, 170_000_000);
        assert_eq!(stats.portfolio_value_label(), "₦170M+");

        let recent: Vec<&str> = stats.recent.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(recent, vec!["2", "1", "4"]);
    }

    #[test]
    fn empty_portfolio() {
        let stats = PortfolioStats::from_properties(&[]);
        assert_eq!(stats.total_properties, 0);
        assert_eq!(stats.portfolio_value, 0);
        assert!(stats.recent.is_empty());
    }

    #[test]
    fn searches_title_and_address_ignoring_case() {
        let all = portfolio();
        let ids = |found: Vec<Property>| found.into_iter().map(|p| p.id).collect::<Vec<_>>();

        assert_eq!(ids(search_properties(&all, "DUPLEX")), vec!["1"]);
        assert_eq!(ids(search_properties(&all, "airport")), vec!["2"]);
        assert_eq!(ids(search_properties(&all, "  ")).len(), 4);
        assert!(search_properties(&all, "penthouse").is_empty());
    }
}
