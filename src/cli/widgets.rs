//! Widgets command handlers

use crate::aggregator::Aggregator;
use crate::cli::output::{format_fetch_table, format_widgets_json, format_widgets_table, widget_views};
use crate::cli::{WidgetsFetchArgs, WidgetsListArgs};
use crate::client::SharedClient;
use crate::config::LabDashConfig;
use crate::registry::WidgetRegistry;
use std::path::Path;
use std::sync::Arc;

fn load_registry(
    path: &Path,
) -> Result<(LabDashConfig, WidgetRegistry), Box<dyn std::error::Error>> {
    let config = LabDashConfig::load(Some(path))?;
    config.validate()?;

    let client = SharedClient::from_config(&config.fetch)?;
    let registry = WidgetRegistry::build(&config.widgets, &client);
    Ok((config, registry))
}

/// Handle `labdash widgets list` command
pub fn handle_widgets_list(args: &WidgetsListArgs) -> Result<String, Box<dyn std::error::Error>> {
    let (_, registry) = load_registry(&args.config)?;
    let views = widget_views(&registry);

    if args.json {
        Ok(format_widgets_json(&views)?)
    } else {
        Ok(format_widgets_table(&views))
    }
}

/// Handle `labdash widgets fetch` command
///
/// Runs one aggregation pass with the same limits the server uses.
pub async fn handle_widgets_fetch(
    args: &WidgetsFetchArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let (config, registry) = load_registry(&args.config)?;
    let aggregator = Aggregator::new(Arc::new(registry), &config.fetch);

    match &args.name {
        Some(name) => {
            let payload = aggregator.fetch_one(name).await?;
            if args.json {
                Ok(serde_json::to_string_pretty(&payload)?)
            } else {
                Ok(format_fetch_table([(name.as_str(), &payload)])?)
            }
        }
        None => {
            let result = aggregator.fetch_all().await;
            if args.json {
                Ok(serde_json::to_string_pretty(&result)?)
            } else {
                Ok(format_fetch_table(result.iter())?)
            }
        }
    }
}
