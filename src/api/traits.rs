use crate::error::Result;
use crate::filters::FilterState;
use crate::models::{Area, AuthPayload, Paginated, Property};
use crate::validation::Registration;
use async_trait::async_trait;

/// Anything that can answer a listing page: the REST API or a local catalog
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// One page of properties matching `filters`
    async fn fetch_properties(&self, filters: &FilterState) -> Result<Paginated<Property>>;

    async fn fetch_areas(&self) -> Result<Vec<Area>>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}

/// Auth endpoints used by [`crate::session::Session`]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthPayload>;

    async fn register(&self, form: &Registration) -> Result<AuthPayload>;

    async fn logout(&self) -> Result<()>;

    async fn change_password(&self, old_password: &str, new_password: &str) -> Result<()>;

    /// Bearer token sent with later requests
    fn set_access_token(&self, token: Option<String>);
}
