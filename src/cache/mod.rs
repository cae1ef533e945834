// Cache module
//
// TTL-keyed result cache that sits in front of the catalog client.

pub mod config;
pub mod entry;
pub mod memory;
pub mod stats;

pub use config::CacheConfig;
pub use entry::{CacheEntry, CacheKey, Operation};
pub use memory::ResultCache;
pub use stats::CacheStats;
