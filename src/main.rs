use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use nutriboard::catalog::OpenFoodFactsClient;
use nutriboard::config::Config;
use nutriboard::dispatch::{QueryDispatcher, Widget, WidgetType};

/// Nutriboard - resolve dashboard widgets against the OpenFoodFacts catalog
#[derive(Parser, Debug)]
#[command(name = "nutriboard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a single widget and print its data
    Widget {
        /// Widget type (products_search, nutri_score_stats, category_top, product_detail)
        widget_type: WidgetType,

        /// Widget configuration as a JSON object
        #[arg(long = "config-json")]
        config_json: Option<String>,
    },
    /// Resolve every widget of a dashboard file (YAML) concurrently
    Dashboard {
        /// Dashboard file with a top-level `widgets` list
        file: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
struct DashboardFile {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    nutriboard::logging::init_subscriber(&config.logging)
        .context("Failed to initialize logging subsystem")?;

    tracing::info!(
        base_url = %config.catalog.base_url,
        timeout_ms = config.catalog.timeout_ms,
        cache_ttl_seconds = config.cache.ttl_seconds,
        "Configuration loaded successfully"
    );

    let client = Arc::new(OpenFoodFactsClient::from_config(&config)?);
    let dispatcher = QueryDispatcher::new(client);

    let output = match args.command {
        Command::Widget {
            widget_type,
            config_json,
        } => {
            let widget_config = match config_json {
                Some(raw) => serde_json::from_str(&raw).context("--config-json is not valid JSON")?,
                None => widget_type.default_config(),
            };
            let data = dispatcher.resolve(widget_type, &widget_config).await;
            serde_json::json!({ "data": data })
        }
        Command::Dashboard { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read dashboard file {}", file.display()))?;
            let mut dashboard: DashboardFile =
                serde_yaml::from_str(&raw).context("Invalid dashboard file")?;
            dashboard.widgets.sort_by_key(|w| w.position);

            let results = dispatcher.resolve_all(&dashboard.widgets).await;
            let widgets: Vec<_> = dashboard
                .widgets
                .iter()
                .zip(results)
                .map(|(widget, data)| {
                    serde_json::json!({
                        "type": widget.widget_type,
                        "title": widget.title(),
                        "position": widget.position,
                        "data": data,
                    })
                })
                .collect();
            serde_json::json!({ "widgets": widgets })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
