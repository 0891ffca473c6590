use super::FilterState;
use crate::models::{Paginated, Property};

/// Keep the properties that satisfy every present constraint, in input order.
///
/// `page` and `limit` are not predicates; see [`paginate`].
pub fn filter_properties(properties: &[Property], filters: &FilterState) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| matches(p, filters))
        .cloned()
        .collect()
}

fn matches(property: &Property, filters: &FilterState) -> bool {
    filters
        .area
        .as_deref()
        .map_or(true, |slug| property.area_slug == slug)
        && filters.category.map_or(true, |c| property.category == c)
        && filters
            .property_type
            .map_or(true, |t| property.property_type == t)
        && filters.min_price.map_or(true, |min| property.price >= min)
        && filters.max_price.map_or(true, |max| property.price <= max)
}

/// Slice an already filtered list into a 1-based page
pub fn paginate<T: Clone>(items: &[T], page: u32, limit: u32) -> Paginated<T> {
    let page = page.max(1);
    let start = (page as usize - 1).saturating_mul(limit as usize);
    let data = items
        .iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();

    Paginated {
        data,
        total: items.len() as u64,
        page,
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, PropertyType, Status};

    fn listing(id: &str, area: &str, category: Category, kind: PropertyType, price: u64) -> Property {
        Property {
            id: id.to_string(),
            title: format!("Listing {id}"),
            slug: format!("listing-{id}"),
            category,
            property_type: kind,
            area: String::new(),
            area_slug: area.to_string(),
            address: String::new(),
            city: "Abuja".into(),
            state: "FCT".into(),
            price,
            rooms: 2,
            bathrooms: 2,
            parking: 1,
            water: true,
            electricity: true,
            status: Status::Available,
            featured: false,
            images: vec![],
            description: String::new(),
            agent_fee: None,
            inspection_fee: None,
            created_at: None,
        }
    }

    fn sample() -> Vec<Property> {
        vec![
            listing("1", "jabi", Category::Rent, PropertyType::Flat, 400_000),
            listing("2", "lugbe", Category::Rent, PropertyType::SelfContain, 1_500_000),
            listing("3", "jabi", Category::Sale, PropertyType::Duplex, 6_000_000),
            listing("4", "maitama", Category::Sale, PropertyType::Duplex, 250_000_000),
        ]
    }

    fn ids(properties: &[Property]) -> Vec<&str> {
        properties.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn empty_filters_are_identity() {
        let all = sample();
        assert_eq!(filter_properties(&all, &FilterState::default()), all);
        assert!(filter_properties(&[], &FilterState::default()).is_empty());
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let filters = FilterState {
            min_price: Some(500_000),
            max_price: Some(2_000_000),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_properties(&sample(), &filters)), vec!["2"]);

        let edge = FilterState {
            min_price: Some(400_000),
            max_price: Some(6_000_000),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_properties(&sample(), &edge)), vec!["1", "2", "3"]);
    }

    #[test]
    fn constraints_are_conjunctive_and_order_is_kept() {
        let filters = FilterState {
            area: Some("jabi".into()),
            category: Some(Category::Sale),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_properties(&sample(), &filters)), vec!["3"]);

        let duplexes = FilterState {
            property_type: Some(PropertyType::Duplex),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_properties(&sample(), &duplexes)), vec!["3", "4"]);
    }

    #[test]
    fn paging_does_not_filter() {
        let filters = FilterState {
            page: Some(2),
            limit: Some(1),
            ..FilterState::default()
        };
        assert_eq!(filter_properties(&sample(), &filters).len(), 4);
    }

    #[test]
    fn paginates_one_based() {
        let all = sample();
        let second = paginate(&all, 2, 3);
        assert_eq!(ids(&second.data), vec!["4"]);
        assert_eq!(second.total, 4);

        let zeroth = paginate(&all, 0, 3);
        assert_eq!(zeroth.page, 1);
        assert_eq!(zeroth.data.len(), 3);

        assert!(paginate(&all, 5, 3).data.is_empty());
    }
}
