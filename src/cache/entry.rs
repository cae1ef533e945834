//! Cache key and entry types
//!
//! This module defines the core cache entry structures:
//! - `CacheKey`: Deterministic identifier derived from a catalog operation and its parameters
//! - `CacheEntry`: A stored lookup result with its creation time and TTL

use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// Separates hashed parameters so adjacent values cannot run together
const PARAM_SEPARATOR: u8 = 0x1f;

/// Catalog operation a cache key belongs to
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Operation {
    Search,
    Product,
    Category,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::Product => "product",
            Operation::Category => "category",
        }
    }
}

/// Cache key for identifying cached lookups
///
/// The operation tag keeps keys from different operations apart even when
/// their parameters hash identically.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    operation: Operation,
    digest: String,
}

impl CacheKey {
    /// Build a key from an operation and every parameter that affects its result
    pub fn new(operation: Operation, params: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for param in params {
            hasher.update(param.as_bytes());
            hasher.update([PARAM_SEPARATOR]);
        }
        Self {
            operation,
            digest: hex::encode(hasher.finalize()),
        }
    }

    /// Key for a free-text search (term and limit)
    pub fn search(term: &str, limit: usize) -> Self {
        Self::new(Operation::Search, &[term, &limit.to_string()])
    }

    /// Key for a barcode lookup (barcode alone)
    pub fn product(barcode: &str) -> Self {
        Self::new(Operation::Product, &[barcode])
    }

    /// Key for a category listing (category and limit)
    pub fn category(category: &str, limit: usize) -> Self {
        Self::new(Operation::Category, &[category, &limit.to_string()])
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "off_{}_{}", self.operation.as_str(), self.digest)
    }
}

/// A cached value together with the data needed to judge its freshness
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached lookup result
    pub value: V,
    /// When this entry was stored
    pub created_at: Instant,
    /// How long the entry stays valid
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    /// Valid strictly while `now < created_at + ttl`
    pub fn is_valid_at(&self, now: Instant) -> bool {
        match self.created_at.checked_add(self.ttl) {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Instant::now())
    }
}
