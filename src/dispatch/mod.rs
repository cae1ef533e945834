//! Query dispatcher
//!
//! Turns a widget's type and configuration into catalog lookups and
//! post-processes the results. Every path returns plain data; the catalog
//! client already degrades failures to empty results.

use futures::future::join_all;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::catalog::{CatalogClient, Product};

pub mod nutriscore;
pub mod widget;

pub use nutriscore::NutriScoreDistribution;
pub use widget::{UnknownWidgetType, Widget, WidgetQuery, WidgetType, STATS_SAMPLE_SIZE};

/// Data rendered by a widget
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetData {
    Products(Vec<Product>),
    /// Absent products serialize as an empty object
    Product(Option<Product>),
    NutriScoreStats(NutriScoreDistribution),
}

impl WidgetData {
    /// True when there is nothing to show ("no results" / "configure a barcode")
    pub fn is_empty(&self) -> bool {
        match self {
            WidgetData::Products(products) => products.is_empty(),
            WidgetData::Product(product) => product.is_none(),
            WidgetData::NutriScoreStats(distribution) => distribution.total() == 0,
        }
    }
}

impl Serialize for WidgetData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WidgetData::Products(products) => products.serialize(serializer),
            WidgetData::Product(Some(product)) => product.serialize(serializer),
            WidgetData::Product(None) => serializer.serialize_map(Some(0))?.end(),
            WidgetData::NutriScoreStats(distribution) => distribution.serialize(serializer),
        }
    }
}

/// Resolves widget queries against an injected catalog client
#[derive(Clone)]
pub struct QueryDispatcher {
    client: Arc<dyn CatalogClient>,
}

impl QueryDispatcher {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self { client }
    }

    /// Resolve a widget type with its raw configuration
    pub async fn resolve(&self, widget_type: WidgetType, config: &JsonValue) -> WidgetData {
        self.execute(WidgetQuery::from_config(widget_type, config))
            .await
    }

    /// Run a single query
    pub async fn execute(&self, query: WidgetQuery) -> WidgetData {
        match query {
            WidgetQuery::Search {
                query,
                limit,
                category,
            } => WidgetData::Products(self.search_products(&query, limit, category.as_deref()).await),
            WidgetQuery::CategoryTop { category, limit } => {
                WidgetData::Products(self.client.get_by_category(&category, limit).await)
            }
            WidgetQuery::ProductDetail { barcode } => {
                if barcode.trim().is_empty() {
                    return WidgetData::Product(None);
                }
                WidgetData::Product(self.client.get_by_barcode(&barcode).await)
            }
            WidgetQuery::NutriScoreStats { category } => {
                let products = self
                    .client
                    .get_by_category(&category, STATS_SAMPLE_SIZE)
                    .await;
                WidgetData::NutriScoreStats(NutriScoreDistribution::from_products(&products))
            }
        }
    }

    /// Category filter wins over the search term; a blank term never reaches upstream
    async fn search_products(
        &self,
        query: &str,
        limit: usize,
        category: Option<&str>,
    ) -> Vec<Product> {
        if let Some(category) = category {
            return self.client.get_by_category(category, limit).await;
        }
        if query.trim().is_empty() {
            tracing::debug!("Blank search term, skipping catalog lookup");
            return Vec::new();
        }
        self.client.search(query, limit).await
    }

    /// Resolve all widgets of a dashboard concurrently, keeping their order
    pub async fn resolve_all(&self, widgets: &[Widget]) -> Vec<WidgetData> {
        join_all(widgets.iter().map(|widget| self.execute(widget.query()))).await
    }
}
