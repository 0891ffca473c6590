use super::FilterState;

/// Named price bracket offered by the price selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub label: &'static str,
    pub min: Option<u64>,
    pub max: Option<u64>,
}

const fn bracket(label: &'static str, min: Option<u64>, max: Option<u64>) -> PriceRange {
    PriceRange { label, min, max }
}

/// Ordered ascending; row 0 is the unconstrained "All Prices" entry.
pub static PRICE_RANGES: [PriceRange; 7] = [
    bracket("All Prices", None, None),
    bracket("Under ₦500K", Some(0), Some(500_000)),
    bracket("₦500K – ₦2M", Some(500_000), Some(2_000_000)),
    bracket("₦2M – ₦10M", Some(2_000_000), Some(10_000_000)),
    bracket("₦10M – ₦50M", Some(10_000_000), Some(50_000_000)),
    bracket("₦50M – ₦200M", Some(50_000_000), Some(200_000_000)),
    bracket("Above ₦200M", Some(200_000_000), None),
];

pub fn range_at(index: usize) -> Option<&'static PriceRange> {
    PRICE_RANGES.get(index)
}

/// Row whose bounds exactly match the current price filters, if any.
///
/// A zero lower bound constrains nothing, so it matches an absent one.
pub fn index_of_current(filters: &FilterState) -> Option<usize> {
    let lower = |v: Option<u64>| v.filter(|n| *n != 0);
    let wanted = (lower(filters.min_price), filters.max_price);

    PRICE_RANGES
        .iter()
        .position(|r| (lower(r.min), r.max) == wanted)
}

/// Index to show in the selector; unmatched bounds fall back to "All Prices".
pub fn selected_index(filters: &FilterState) -> usize {
    index_of_current(filters).unwrap_or(0)
}
