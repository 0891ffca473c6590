//! State behind one listing page: the active filters, the latest result
//! page and the last error.
//!
//! Every fetch is tagged with a generation number. A result is only applied
//! when its generation is still the newest, so a slow response to an older
//! filter selection can never overwrite a newer one.

use crate::api::ListingSource;
use crate::error::Result;
use crate::filters::{FilterPatch, FilterState};
use crate::models::{Area, Paginated, Property};
use tracing::{debug, info, warn};

/// Handle for one in-flight fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    filters: FilterState,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Filters snapshot the fetch must use
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }
}

pub struct ListingFeed<S> {
    source: S,
    filters: FilterState,
    generation: u64,
    results: Option<Paginated<Property>>,
    error: Option<String>,
    areas: Vec<Area>,
}

impl<S: ListingSource> ListingFeed<S> {
    pub fn new(source: S) -> Self {
        Self::with_filters(source, FilterState::default())
    }

    pub fn with_filters(source: S, filters: FilterState) -> Self {
        Self {
            source,
            filters,
            generation: 0,
            results: None,
            error: None,
            areas: Vec::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn results(&self) -> Option<&Paginated<Property>> {
        self.results.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Apply a filter change. Invalid states are rejected and the current
    /// filters are kept.
    pub fn update(&mut self, patch: FilterPatch) -> Result<&FilterState> {
        let next = self.filters.apply(patch);
        next.validate()?;
        self.filters = next;
        Ok(&self.filters)
    }

    pub fn clear(&mut self) -> &FilterState {
        self.filters = self.filters.apply(FilterPatch::Clear);
        &self.filters
    }

    /// Start a fetch for the current filters, superseding any earlier one
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        debug!("Starting fetch generation {}", self.generation);
        FetchTicket {
            generation: self.generation,
            filters: self.filters.clone(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Record the outcome of a fetch. Returns `false` when the ticket was
    /// superseded and the outcome was dropped.
    pub fn complete(&mut self, ticket: FetchTicket, outcome: Result<Paginated<Property>>) -> bool {
        if !self.is_current(&ticket) {
            debug!(
                "Dropping stale result for generation {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }

        match outcome {
            Ok(page) => {
                info!(
                    "Showing {} of {} properties from {}",
                    page.data.len(),
                    page.total,
                    self.source.source_name()
                );
                self.results = Some(page);
                self.error = None;
            }
            Err(e) => {
                warn!("Listing fetch failed: {}", e);
                self.results = None;
                self.error = Some(e.user_message());
            }
        }
        true
    }

    /// Fetch the current filters and apply the result
    pub async fn refresh(&mut self) -> bool {
        let ticket = self.begin();
        let outcome = self.source.fetch_properties(ticket.filters()).await;
        self.complete(ticket, outcome)
    }

    /// Load the area list used by the area selector
    pub async fn load_areas(&mut self) -> Result<&[Area]> {
        self.areas = self.source.fetch_areas().await?;
        Ok(&self.areas)
    }
}
