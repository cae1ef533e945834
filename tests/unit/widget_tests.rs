// Widget configuration parsing tests

use rstest::rstest;
use serde_json::json;

use nutriboard::dispatch::{Widget, WidgetQuery, WidgetType};

#[rstest]
#[case("products_search", WidgetType::ProductsSearch)]
#[case("nutri-score-stats", WidgetType::NutriScoreStats)]
#[case("CATEGORY_TOP", WidgetType::CategoryTop)]
#[case(" product_detail ", WidgetType::ProductDetail)]
fn test_widget_type_parses_names(#[case] name: &str, #[case] expected: WidgetType) {
    assert_eq!(name.parse::<WidgetType>().unwrap(), expected);
}

#[test]
fn test_unknown_widget_type_is_rejected() {
    let err = "pie_chart".parse::<WidgetType>().unwrap_err();
    assert_eq!(err.to_string(), "unknown widget type 'pie_chart'");
}

#[test]
fn test_search_query_defaults() {
    let query = WidgetQuery::from_config(WidgetType::ProductsSearch, &json!({}));
    assert_eq!(
        query,
        WidgetQuery::Search {
            query: String::new(),
            limit: 10,
            category: None,
        }
    );
}

#[test]
fn test_search_query_reads_config() {
    let query = WidgetQuery::from_config(
        WidgetType::ProductsSearch,
        &json!({"query": "granola", "limit": "7", "category": "breakfasts"}),
    );
    assert_eq!(
        query,
        WidgetQuery::Search {
            query: "granola".to_string(),
            limit: 7,
            category: Some("breakfasts".to_string()),
        }
    );
}

#[test]
fn test_blank_category_falls_back_to_default() {
    let query = WidgetQuery::from_config(WidgetType::CategoryTop, &json!({"category": "  "}));
    assert_eq!(
        query,
        WidgetQuery::CategoryTop {
            category: "beverages".to_string(),
            limit: 5,
        }
    );

    let query = WidgetQuery::from_config(WidgetType::NutriScoreStats, &json!({"category": 12}));
    assert_eq!(
        query,
        WidgetQuery::NutriScoreStats {
            category: "12".to_string(),
        }
    );
}

#[test]
fn test_numeric_barcode_is_accepted() {
    let query = WidgetQuery::from_config(
        WidgetType::ProductDetail,
        &json!({"barcode": 3017620422003u64}),
    );
    assert_eq!(
        query,
        WidgetQuery::ProductDetail {
            barcode: "3017620422003".to_string(),
        }
    );
}

#[test]
fn test_widget_deserializes_from_dashboard_yaml() {
    let yaml = r#"
- type: category_top
  title: "Drinks"
  position: 2
  config:
    category: waters
    limit: 3
- type: product_detail
"#;
    let widgets: Vec<Widget> = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(widgets.len(), 2);
    assert_eq!(widgets[0].title(), "Drinks");
    assert_eq!(
        widgets[0].query(),
        WidgetQuery::CategoryTop {
            category: "waters".to_string(),
            limit: 3,
        }
    );
    assert_eq!(widgets[1].title(), "Product");
    assert_eq!(widgets[1].position, 0);
    assert_eq!(
        widgets[1].query(),
        WidgetQuery::ProductDetail {
            barcode: String::new(),
        }
    );
}

#[test]
fn test_empty_stored_config_uses_type_defaults() {
    let widget = Widget {
        config: Some(json!({})),
        ..Widget::new(WidgetType::NutriScoreStats)
    };
    assert_eq!(
        widget.query(),
        WidgetQuery::NutriScoreStats {
            category: "snacks".to_string(),
        }
    );
}
