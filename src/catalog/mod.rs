//! Remote catalog access
//!
//! - `client`: the `CatalogClient` seam and its OpenFoodFacts implementation
//! - `product`: the normalized `Product` record and upstream normalization
//! - `error`: failures that stay inside the client

pub mod client;
pub mod error;
pub mod product;

pub use client::{CatalogClient, OpenFoodFactsClient, MAX_PAGE_SIZE};
pub use error::CatalogError;
pub use product::{normalize, normalize_json, NutriScore, Product, RawProduct};

#[cfg(test)]
pub use client::MockCatalogClient;
