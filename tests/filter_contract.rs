use serde_json::json;
use urban360::api::{Catalog, ListingSource};
use urban360::feed::ListingFeed;
use urban360::filters::{
    filter_properties, index_of_current, selected_index, FilterPatch, FilterState, QueryBuilder,
    PRICE_RANGES,
};
use urban360::models::{Category, Property, PropertyType};

fn priced(prices: &[u64]) -> Vec<Property> {
    prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            serde_json::from_value(json!({
                "id": i.to_string(),
                "title": format!("Listing {i}"),
                "slug": format!("listing-{i}"),
                "category": if i % 2 == 0 { "Rent" } else { "Sale" },
                "propertyType": "Flat",
                "areaSlug": if i % 3 == 0 { "jabi" } else { "gwarinpa" },
                "price": price
            }))
            .unwrap()
        })
        .collect()
}

fn every_patch_kind() -> Vec<FilterPatch> {
    vec![
        FilterPatch::Area(Some("jabi".into())),
        FilterPatch::Category(Some(Category::Rent)),
        FilterPatch::PropertyType(Some(PropertyType::Bungalow)),
        FilterPatch::MinPrice(Some(1)),
        FilterPatch::MaxPrice(Some(9)),
        FilterPatch::Page(Some(4)),
        FilterPatch::Limit(Some(50)),
    ]
}

#[test]
fn falsy_patches_never_leave_a_key_behind() {
    let full = FilterState::default().apply_all(every_patch_kind());
    assert_eq!(full.active_count(), 7);

    let cleared = full.apply_all([
        FilterPatch::Area(Some(String::new())),
        FilterPatch::Category(None),
        FilterPatch::PropertyType(None),
        FilterPatch::MinPrice(Some(0)),
        FilterPatch::MaxPrice(None),
        FilterPatch::Page(Some(0)),
        FilterPatch::Limit(None),
    ]);
    assert!(cleared.is_empty());
    assert_eq!(serde_json::to_value(&cleared).unwrap(), json!({}));
}

#[test]
fn empty_filters_return_input_unchanged() {
    let listings = priced(&[5, 1, 3, 9_000_000]);
    assert_eq!(filter_properties(&listings, &FilterState::default()), listings);
}

#[test]
fn price_window_keeps_only_records_inside_it() {
    let listings = priced(&[1_999_999, 2_000_000, 7_500_000, 10_000_000, 10_000_001]);
    let filters = FilterState {
        min_price: Some(2_000_000),
        max_price: Some(10_000_000),
        ..FilterState::default()
    };

    let kept = filter_properties(&listings, &filters);
    assert_eq!(kept.len(), 3);
    assert!(kept
        .iter()
        .all(|p| (2_000_000..=10_000_000).contains(&p.price)));
}

#[test]
fn bracket_example_from_the_listing_page() {
    let listings = priced(&[400_000, 1_500_000, 6_000_000]);
    let filters = FilterState::default().apply(FilterPatch::PriceBracket(2));

    let kept = filter_properties(&listings, &filters);
    let prices: Vec<u64> = kept.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![1_500_000]);
}

#[test]
fn area_query_carries_no_other_filters() {
    let filters = FilterState::default().apply(FilterPatch::Area(Some("jabi".into())));
    let query = QueryBuilder::default().build(&filters);

    assert_eq!(query.to_string(), "page=1&limit=20&area=jabi");
}

#[test]
fn price_selector_index() {
    let filters = FilterState {
        min_price: Some(500_000),
        max_price: Some(2_000_000),
        ..FilterState::default()
    };
    let index = index_of_current(&filters).unwrap();
    assert_eq!(PRICE_RANGES[index].label, "₦500K – ₦2M");
    assert_eq!(selected_index(&FilterState::default()), 0);
}

#[test]
fn clearing_always_yields_empty_state() {
    let states = [
        FilterState::default(),
        FilterState::default().apply_all(every_patch_kind()),
        FilterState::default().apply(FilterPatch::PriceBracket(6)),
    ];
    for state in states {
        assert_eq!(state.apply(FilterPatch::Clear), FilterState::default());
    }
}

#[tokio::test]
async fn offline_feed_pages_through_an_area() {
    let catalog = Catalog::new(priced(&[100, 200, 300, 400, 500, 600, 700])).page_limit(2);
    let mut feed = ListingFeed::new(catalog);
    feed.update(FilterPatch::Area(Some("jabi".into()))).unwrap();

    assert!(feed.refresh().await);
    let first = feed.results().unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.data.len(), 2);

    feed.update(FilterPatch::Page(Some(2))).unwrap();
    feed.refresh().await;
    let second = feed.results().unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].price, 700);
    assert!(!second.has_next());

    assert_eq!(feed.source().source_name(), "local catalog");
}
