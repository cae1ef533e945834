// End-to-end widget resolution: dispatcher -> client -> fake upstream

use serde_json::json;
use std::sync::Arc;

use nutriboard::dispatch::{QueryDispatcher, Widget, WidgetData, WidgetType, STATS_SAMPLE_SIZE};

use super::fake_upstream::{listing, raw_product, CannedResponse, FakeUpstream};

fn category_with_grades(grades: &[&str]) -> serde_json::Value {
    let products: Vec<_> = grades
        .iter()
        .enumerate()
        .map(|(i, grade)| raw_product(&i.to_string(), "Snack", grade))
        .collect();
    json!({ "products": products })
}

async fn dispatcher_for(upstream: &FakeUpstream) -> QueryDispatcher {
    QueryDispatcher::new(Arc::new(upstream.client()))
}

#[tokio::test]
async fn test_products_search_widget_with_blank_query_makes_no_request() {
    let upstream = FakeUpstream::start(|_| CannedResponse::json(listing(3))).await;
    let dispatcher = dispatcher_for(&upstream).await;

    let data = dispatcher
        .resolve(WidgetType::ProductsSearch, &json!({"query": "  ", "limit": 10}))
        .await;

    assert_eq!(data, WidgetData::Products(Vec::new()));
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_products_search_widget_queries_search_endpoint() {
    let upstream = FakeUpstream::start(|_| CannedResponse::json(listing(4))).await;
    let dispatcher = dispatcher_for(&upstream).await;

    let data = dispatcher
        .resolve(WidgetType::ProductsSearch, &json!({"query": "yogurt", "limit": 2}))
        .await;

    let rendered = serde_json::to_value(&data).unwrap();
    assert_eq!(rendered.as_array().unwrap().len(), 2);
    assert_eq!(upstream.hits_for("/cgi/search.pl"), 1);
}

#[tokio::test]
async fn test_products_search_widget_with_category_lists_the_category() {
    let upstream = FakeUpstream::start(|_| CannedResponse::json(listing(2))).await;
    let dispatcher = dispatcher_for(&upstream).await;

    let data = dispatcher
        .resolve(
            WidgetType::ProductsSearch,
            &json!({"query": "ignored", "category": "cheeses"}),
        )
        .await;

    assert!(!data.is_empty());
    assert_eq!(upstream.hits_for("/category/cheeses.json"), 1);
    assert_eq!(upstream.hits_for("/cgi/search.pl"), 0);
}

#[tokio::test]
async fn test_nutri_score_stats_widget_samples_category() {
    let upstream = FakeUpstream::start(|_| {
        CannedResponse::json(category_with_grades(&["a", "a", "b", "e", "", "unknown"]))
    })
    .await;
    let dispatcher = dispatcher_for(&upstream).await;

    let data = dispatcher
        .resolve(WidgetType::NutriScoreStats, &json!({"category": "biscuits"}))
        .await;

    assert_eq!(
        serde_json::to_value(&data).unwrap(),
        json!({"A": 2, "B": 1, "C": 0, "D": 0, "E": 1, "?": 2})
    );
    let target = &upstream.requests()[0];
    assert!(target.starts_with("/category/biscuits.json"), "target: {}", target);
    assert!(
        target.contains(&format!("page_size={}", STATS_SAMPLE_SIZE)),
        "target: {}",
        target
    );
}

#[tokio::test]
async fn test_nutri_score_stats_on_failure_is_zero_filled() {
    let upstream = FakeUpstream::start(|_| CannedResponse::status(500, "")).await;
    let dispatcher = dispatcher_for(&upstream).await;

    let data = dispatcher.resolve(WidgetType::NutriScoreStats, &json!({})).await;

    assert_eq!(
        serde_json::to_value(&data).unwrap(),
        json!({"A": 0, "B": 0, "C": 0, "D": 0, "E": 0, "?": 0})
    );
}

#[tokio::test]
async fn test_product_detail_widget_without_barcode_is_empty_object() {
    let upstream = FakeUpstream::start(|_| CannedResponse::json(json!({"status": 1}))).await;
    let dispatcher = dispatcher_for(&upstream).await;

    let data = dispatcher.resolve(WidgetType::ProductDetail, &json!({})).await;

    assert_eq!(serde_json::to_string(&data).unwrap(), "{}");
    assert_eq!(upstream.hits(), 0);
}

#[tokio::test]
async fn test_product_detail_widget_unknown_barcode_is_empty_object() {
    let upstream = FakeUpstream::start(|_| {
        CannedResponse::status(404, r#"{"status":0,"status_verbose":"product not found"}"#)
    })
    .await;
    let dispatcher = dispatcher_for(&upstream).await;

    let data = dispatcher
        .resolve(WidgetType::ProductDetail, &json!({"barcode": "0000000000000"}))
        .await;

    assert_eq!(data, WidgetData::Product(None));
    assert_eq!(serde_json::to_string(&data).unwrap(), "{}");
}

#[tokio::test]
async fn test_dashboard_widgets_share_the_client_cache() {
    let upstream = FakeUpstream::start(|target| {
        if target.starts_with("/api/v2/product/") {
            CannedResponse::json(json!({
                "status": 1,
                "product": raw_product("3017620422003", "Nutella", "e"),
            }))
        } else {
            CannedResponse::json(category_with_grades(&["a", "c", "c"]))
        }
    })
    .await;
    let dispatcher = dispatcher_for(&upstream).await;

    let widgets = vec![
        Widget {
            config: Some(json!({"barcode": "3017620422003"})),
            ..Widget::new(WidgetType::ProductDetail)
        },
        Widget {
            position: 1,
            config: Some(json!({"category": "snacks", "limit": 5})),
            ..Widget::new(WidgetType::CategoryTop)
        },
        Widget {
            position: 2,
            ..Widget::new(WidgetType::NutriScoreStats)
        },
    ];

    let first = dispatcher.resolve_all(&widgets).await;
    let second = dispatcher.resolve_all(&widgets).await;

    assert_eq!(first, second);
    assert_eq!(serde_json::to_value(&first[0]).unwrap()["name"], "Nutella");
    assert_eq!(serde_json::to_value(&first[1]).unwrap().as_array().unwrap().len(), 3);
    assert_eq!(
        serde_json::to_value(&first[2]).unwrap(),
        json!({"A": 1, "B": 0, "C": 2, "D": 0, "E": 0, "?": 0})
    );
    // One request per distinct lookup; the second pass is all cache hits
    assert_eq!(upstream.hits(), 3);
}
