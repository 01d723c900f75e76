//! Catalog provider abstractions and implementations.
//!
//! This module contains:
//! - The `CatalogProvider` trait that all providers implement
//! - Provider pacing configuration
//! - Concrete provider implementations (Spotify)

mod capabilities;
mod traits;

pub mod spotify;

pub use capabilities::RateLimit;
pub use traits::CatalogProvider;
