//! OpenFoodFacts catalog client
//!
//! Issues the three catalog lookups (search, barcode, category) against a
//! configured base URL, caches successful answers, and normalizes results
//! into `Product` records. Failures are logged and degrade to empty or
//! absent results; nothing is raised to the caller.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};

use super::error::CatalogError;
use super::product::{normalize_json, Product};
use crate::cache::{CacheConfig, CacheKey, CacheStats, ResultCache};
use crate::config::{CatalogConfig, Config};
use crate::error::{Error, Result};

/// Largest page size the upstream serves in one request
pub const MAX_PAGE_SIZE: usize = 50;

/// Field projection sent with every request to keep payloads small
const PRODUCT_FIELDS: &str = "code,product_name,brands,nutriscore_grade,image_small_url,categories";

/// Catalog lookups as seen by the dispatcher
///
/// Every operation is total: failures come back as empty or absent values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text search, at most `limit` products
    async fn search(&self, term: &str, limit: usize) -> Vec<Product>;

    /// Single product by barcode, `None` when unknown or on failure
    async fn get_by_barcode(&self, barcode: &str) -> Option<Product>;

    /// Products of a category, at most `limit`
    async fn get_by_category(&self, category: &str, limit: usize) -> Vec<Product>;
}

/// Response shape of the search and category endpoints
#[derive(Debug, Deserialize)]
struct ProductListResponse {
    #[serde(default)]
    products: Vec<JsonValue>,
}

/// Response shape of the product endpoint
#[derive(Debug, Deserialize)]
struct ProductLookupResponse {
    #[serde(default)]
    status: Option<JsonValue>,
    #[serde(default)]
    product: Option<JsonValue>,
}

impl ProductLookupResponse {
    /// Upstream signals a hit with `status: 1`
    fn is_found(&self) -> bool {
        match &self.status {
            Some(JsonValue::Number(n)) => n.as_i64() == Some(1),
            Some(JsonValue::String(s)) => s == "1",
            _ => false,
        }
    }
}

/// reqwest-backed catalog client with its own result cache
pub struct OpenFoodFactsClient {
    base_url: String,
    http: Client,
    ttl: Duration,
    listings: ResultCache<Vec<Product>>,
    products: ResultCache<Option<Product>>,
}

impl OpenFoodFactsClient {
    /// Build a client from catalog and cache settings
    ///
    /// # Errors
    /// Returns `Error::HttpClient` if the HTTP client cannot be created.
    pub fn new(catalog: &CatalogConfig, cache: &CacheConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(catalog.timeout())
            .user_agent(catalog.user_agent.clone())
            .build()
            .map_err(|e| Error::HttpClient(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: catalog.base_url.trim_end_matches('/').to_string(),
            http,
            ttl: cache.ttl(),
            listings: ResultCache::new(cache),
            products: ResultCache::new(cache),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.catalog, &config.cache)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Combined statistics of the listing and product stores
    pub fn cache_stats(&self) -> CacheStats {
        self.listings.stats().merge(&self.products.stats())
    }

    /// Drop every cached lookup
    pub async fn clear_cache(&self) {
        self.listings.clear().await;
        self.products.clear().await;
    }

    async fn send(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<(StatusCode, bytes::Bytes), CatalogError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, CatalogError> {
        let (status, body) = self.send(url, query).await?;
        decode(status, &body)
    }

    async fn fetch_search(
        &self,
        term: &str,
        limit: usize,
    ) -> std::result::Result<Vec<Product>, CatalogError> {
        let start = Instant::now();
        let url = format!("{}/cgi/search.pl", self.base_url);
        let query = [
            ("search_terms", term.to_string()),
            ("search_simple", "1".to_string()),
            ("action", "process".to_string()),
            ("json", "1".to_string()),
            ("page_size", limit.to_string()),
            ("fields", PRODUCT_FIELDS.to_string()),
        ];

        let response: ProductListResponse = self.get_json(&url, &query).await?;
        let products = normalize_list(&response.products, limit);

        tracing::info!(
            operation = "search",
            query = term,
            limit = limit,
            results = products.len(),
            duration_ms = elapsed_ms(start),
            "Catalog search succeeded"
        );
        Ok(products)
    }

    async fn fetch_product(
        &self,
        barcode: &str,
    ) -> std::result::Result<Option<Product>, CatalogError> {
        let start = Instant::now();
        let url = format!(
            "{}/api/v2/product/{}.json",
            self.base_url,
            urlencoding::encode(barcode)
        );
        let query = [("fields", PRODUCT_FIELDS.to_string())];

        let (status, body) = self.send(&url, &query).await?;

        // The product endpoint answers unknown barcodes with 404 plus a status flag
        let lookup: ProductLookupResponse = if status == StatusCode::NOT_FOUND {
            match serde_json::from_slice::<ProductLookupResponse>(&body) {
                Ok(lookup) if !lookup.is_found() => lookup,
                _ => return Err(CatalogError::Status { status: 404 }),
            }
        } else {
            decode(status, &body)?
        };

        if !lookup.is_found() {
            tracing::info!(
                operation = "barcode",
                barcode = barcode,
                duration_ms = elapsed_ms(start),
                "Catalog product not found"
            );
            return Ok(None);
        }

        tracing::info!(
            operation = "barcode",
            barcode = barcode,
            duration_ms = elapsed_ms(start),
            "Catalog barcode lookup succeeded"
        );
        Ok(Some(normalize_json(
            lookup.product.as_ref().unwrap_or(&JsonValue::Null),
        )))
    }

    async fn fetch_category(
        &self,
        category: &str,
        limit: usize,
    ) -> std::result::Result<Vec<Product>, CatalogError> {
        let start = Instant::now();
        let url = format!(
            "{}/category/{}.json",
            self.base_url,
            urlencoding::encode(category)
        );
        let query = [
            ("page_size", limit.to_string()),
            ("fields", PRODUCT_FIELDS.to_string()),
        ];

        let response: ProductListResponse = self.get_json(&url, &query).await?;
        let products = normalize_list(&response.products, limit);

        tracing::info!(
            operation = "category",
            category = category,
            limit = limit,
            results = products.len(),
            duration_ms = elapsed_ms(start),
            "Catalog category lookup succeeded"
        );
        Ok(products)
    }
}

/// Log a failed lookup under the same field name its success event uses;
/// transport failures are errors, upstream answers we cannot use are warnings
macro_rules! log_failure {
    ($operation:literal, $field:ident = $value:expr, $err:expr, $start:expr $(, limit = $limit:expr)?) => {{
        let err: &CatalogError = $err;
        if err.is_transport() {
            tracing::error!(
                operation = $operation,
                $field = $value,
                $(limit = $limit,)?
                error_kind = err.kind(),
                error = %err,
                duration_ms = elapsed_ms($start),
                "Catalog network error"
            );
        } else {
            tracing::warn!(
                operation = $operation,
                $field = $value,
                $(limit = $limit,)?
                error_kind = err.kind(),
                error = %err,
                duration_ms = elapsed_ms($start),
                "Catalog request failed"
            );
        }
    }};
}

#[async_trait]
impl CatalogClient for OpenFoodFactsClient {
    async fn search(&self, term: &str, limit: usize) -> Vec<Product> {
        let term = term.trim();
        let limit = limit.min(MAX_PAGE_SIZE);
        if term.is_empty() || limit == 0 {
            return Vec::new();
        }

        let start = Instant::now();
        let result = self
            .listings
            .get_or_compute(CacheKey::search(term, limit), self.ttl, || {
                self.fetch_search(term, limit)
            })
            .await;

        result.unwrap_or_else(|err| {
            log_failure!("search", query = term, &err, start, limit = limit);
            Vec::new()
        })
    }

    async fn get_by_barcode(&self, barcode: &str) -> Option<Product> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return None;
        }

        let start = Instant::now();
        let result = self
            .products
            .get_or_compute(CacheKey::product(barcode), self.ttl, || {
                self.fetch_product(barcode)
            })
            .await;

        result.unwrap_or_else(|err| {
            log_failure!("barcode", barcode = barcode, &err, start);
            None
        })
    }

    async fn get_by_category(&self, category: &str, limit: usize) -> Vec<Product> {
        let category = category.trim();
        let limit = limit.min(MAX_PAGE_SIZE);
        if category.is_empty() || limit == 0 {
            return Vec::new();
        }

        let start = Instant::now();
        let result = self
            .listings
            .get_or_compute(CacheKey::category(category, limit), self.ttl, || {
                self.fetch_category(category, limit)
            })
            .await;

        result.unwrap_or_else(|err| {
            log_failure!("category", category = category, &err, start, limit = limit);
            Vec::new()
        })
    }
}

fn decode<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> std::result::Result<T, CatalogError> {
    if !status.is_success() {
        return Err(CatalogError::Status {
            status: status.as_u16(),
        });
    }
    serde_json::from_slice(body).map_err(|e| CatalogError::Decode(e.to_string()))
}

fn normalize_list(raw: &[JsonValue], limit: usize) -> Vec<Product> {
    raw.iter().take(limit).map(normalize_json).collect()
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
