use crate::api::traits::ListingSource;
use crate::error::Result;
use crate::filters::{filter_properties, paginate, FilterState, DEFAULT_PAGE_LIMIT};
use crate::models::{known_areas, Area, Paginated, Property};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// In-memory listings, answered with the same filters the API accepts
#[derive(Debug, Clone)]
pub struct Catalog {
    areas: Vec<Area>,
    properties: Vec<Property>,
    page_limit: u32,
}

impl Catalog {
    pub fn new(properties: Vec<Property>) -> Self {
        Self::with_areas(known_areas(), properties)
    }

    pub fn with_areas(areas: Vec<Area>, properties: Vec<Property>) -> Self {
        Self {
            areas,
            properties,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    /// Load properties from a JSON array (or an API envelope saved to disk)
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let properties = parse_properties(&raw)?;
        info!("Loaded {} properties from {}", properties.len(), path.display());
        Ok(Self::new(properties))
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn area_by_slug(&self, slug: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.slug == slug)
    }

    pub fn property_by_slug(&self, slug: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.slug == slug)
    }

    pub fn properties_in_area(&self, slug: &str) -> Vec<Property> {
        let filters = FilterState {
            area: Some(slug.to_string()),
            ..FilterState::default()
        };
        filter_properties(&self.properties, &filters)
    }

    pub fn featured(&self, limit: usize) -> Vec<Property> {
        self.properties
            .iter()
            .filter(|p| p.featured)
            .take(limit)
            .cloned()
            .collect()
    }
}

fn parse_properties(raw: &str) -> Result<Vec<Property>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Saved {
        List(Vec<Property>),
        Page(Paginated<Property>),
        Envelope { data: Paginated<Property> },
    }

    Ok(match serde_json::from_str(raw)? {
        Saved::List(list) => list,
        Saved::Page(page) | Saved::Envelope { data: page } => page.data,
    })
}

#[async_trait]
impl ListingSource for Catalog {
    async fn fetch_properties(&self, filters: &FilterState) -> Result<Paginated<Property>> {
        filters.validate()?;
        let matched = filter_properties(&self.properties, filters);
        Ok(paginate(
            &matched,
            filters.page.unwrap_or(1),
            filters.limit.unwrap_or(self.page_limit),
        ))
    }

    async fn fetch_areas(&self) -> Result<Vec<Area>> {
        Ok(self.areas.clone())
    }

    fn source_name(&self) -> &'static str {
        "local catalog"
    }
}
