// Error types module

use std::fmt;

/// Crate-level error for construction paths
///
/// Lookups never fail from the caller's point of view; these errors only
/// surface while loading configuration, building the HTTP client, or
/// installing the log subscriber.
#[derive(Debug, Clone)]
pub enum Error {
    /// Configuration errors (invalid YAML, missing env vars, bad values)
    Config(String),

    /// The underlying HTTP client could not be built
    HttpClient(String),

    /// The tracing subscriber could not be installed
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::HttpClient(msg) => write!(f, "HTTP client error: {}", msg),
            Error::Logging(msg) => write!(f, "Logging error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for construction paths
pub type Result<T> = std::result::Result<T, Error>;
