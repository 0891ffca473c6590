pub mod catalog;
pub mod client;
pub mod traits;

pub use catalog::Catalog;
pub use client::UrbanClient;
pub use traits::{AuthApi, ListingSource};
