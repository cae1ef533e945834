//! Widget types and per-request lookup queries

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_CATEGORY_LIMIT: usize = 5;
pub const DEFAULT_TOP_CATEGORY: &str = "beverages";
pub const DEFAULT_STATS_CATEGORY: &str = "snacks";
/// Sample size pulled for a Nutri-Score distribution
pub const STATS_SAMPLE_SIZE: usize = 50;

/// The four kinds of dashboard widget
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    ProductsSearch,
    NutriScoreStats,
    CategoryTop,
    ProductDetail,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown widget type '{0}'")]
pub struct UnknownWidgetType(pub String);

impl WidgetType {
    pub const ALL: [WidgetType; 4] = [
        WidgetType::ProductsSearch,
        WidgetType::NutriScoreStats,
        WidgetType::CategoryTop,
        WidgetType::ProductDetail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::ProductsSearch => "products_search",
            WidgetType::NutriScoreStats => "nutri_score_stats",
            WidgetType::CategoryTop => "category_top",
            WidgetType::ProductDetail => "product_detail",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WidgetType::ProductsSearch => "Product search",
            WidgetType::NutriScoreStats => "Nutri-Score stats",
            WidgetType::CategoryTop => "Top of category",
            WidgetType::ProductDetail => "Product detail",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            WidgetType::ProductsSearch => "OpenFoodFacts search",
            WidgetType::NutriScoreStats => "Nutri-Score",
            WidgetType::CategoryTop => "Top products",
            WidgetType::ProductDetail => "Product",
        }
    }

    /// Configuration a freshly added widget starts with
    pub fn default_config(&self) -> JsonValue {
        match self {
            WidgetType::ProductsSearch => json!({"query": "", "limit": DEFAULT_SEARCH_LIMIT}),
            WidgetType::NutriScoreStats => json!({"category": DEFAULT_STATS_CATEGORY}),
            WidgetType::CategoryTop => {
                json!({"category": DEFAULT_TOP_CATEGORY, "limit": DEFAULT_CATEGORY_LIMIT})
            }
            WidgetType::ProductDetail => json!({"barcode": ""}),
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetType {
    type Err = UnknownWidgetType;

    /// Accepts snake_case and kebab-case names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        WidgetType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownWidgetType(s.to_string()))
    }
}

/// A configured widget as stored on a dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub config: Option<JsonValue>,
}

impl Widget {
    pub fn new(widget_type: WidgetType) -> Self {
        Self {
            widget_type,
            title: None,
            position: 0,
            config: None,
        }
    }

    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .unwrap_or_else(|| self.widget_type.default_title())
    }

    /// Stored config, or the type's default when none (or an empty object) is stored
    pub fn effective_config(&self) -> JsonValue {
        match &self.config {
            Some(JsonValue::Object(map)) if !map.is_empty() => JsonValue::Object(map.clone()),
            _ => self.widget_type.default_config(),
        }
    }

    pub fn query(&self) -> WidgetQuery {
        WidgetQuery::from_config(self.widget_type, &self.effective_config())
    }
}

/// One lookup to perform, built from a widget's type and configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetQuery {
    /// Free-text search, or a category listing when `category` is set
    Search {
        query: String,
        limit: usize,
        category: Option<String>,
    },
    CategoryTop {
        category: String,
        limit: usize,
    },
    ProductDetail {
        barcode: String,
    },
    NutriScoreStats {
        category: String,
    },
}

impl WidgetQuery {
    /// Build a query from a loosely typed config object
    ///
    /// Missing or ill-typed values fall back to the type's defaults; this
    /// never fails.
    pub fn from_config(widget_type: WidgetType, config: &JsonValue) -> Self {
        match widget_type {
            WidgetType::ProductsSearch => WidgetQuery::Search {
                query: config_text(config, "query").unwrap_or_default(),
                limit: config_limit(config, "limit", DEFAULT_SEARCH_LIMIT),
                category: config_text(config, "category").filter(|c| !c.trim().is_empty()),
            },
            WidgetType::CategoryTop => WidgetQuery::CategoryTop {
                category: config_category(config, DEFAULT_TOP_CATEGORY),
                limit: config_limit(config, "limit", DEFAULT_CATEGORY_LIMIT),
            },
            WidgetType::ProductDetail => WidgetQuery::ProductDetail {
                barcode: config_text(config, "barcode").unwrap_or_default(),
            },
            WidgetType::NutriScoreStats => WidgetQuery::NutriScoreStats {
                category: config_category(config, DEFAULT_STATS_CATEGORY),
            },
        }
    }

    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetQuery::Search { .. } => WidgetType::ProductsSearch,
            WidgetQuery::CategoryTop { .. } => WidgetType::CategoryTop,
            WidgetQuery::ProductDetail { .. } => WidgetType::ProductDetail,
            WidgetQuery::NutriScoreStats { .. } => WidgetType::NutriScoreStats,
        }
    }
}

/// Text value; numbers are accepted since barcodes are often typed as digits
fn config_text(config: &JsonValue, key: &str) -> Option<String> {
    match config.get(key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative integer or numeric string, otherwise `default`
fn config_limit(config: &JsonValue, key: &str, default: usize) -> usize {
    let parsed = match config.get(key) {
        Some(JsonValue::Number(n)) => n.as_u64(),
        Some(JsonValue::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(default)
}

/// Category name; blank falls back to `default`
fn config_category(config: &JsonValue, default: &str) -> String {
    config_text(config, "category")
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
