// Nutriboard widget lookup library
//
// Cached catalog lookups behind dashboard widgets.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
