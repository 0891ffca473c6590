//! Client library for the 360Urban listings platform: listing filters,
//! the REST API client, an offline catalog and the admin session.

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod filters;
pub mod format;
pub mod models;
pub mod session;
pub mod validation;

pub use error::{Error, Result};
