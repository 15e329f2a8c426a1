//! Config command handlers

use crate::cli::{ConfigCheckArgs, ConfigInitArgs};
use crate::config::LabDashConfig;
use crate::widgets::WidgetKind;
use colored::Colorize;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../labdash.example.toml");

/// Handle `labdash config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    println!("✓ Configuration file created: {}", args.output.display());
    println!("  Edit this file to add your widgets and services.");

    Ok(())
}

/// Handle `labdash config check` command
///
/// Returns a summary of the parsed file. Unknown widget types are reported
/// but do not fail the check, since the server skips them at runtime.
pub fn handle_config_check(args: &ConfigCheckArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = LabDashConfig::load(Some(&args.config))?;
    config.validate()?;

    let enabled = config.widgets.iter().filter(|w| w.enabled).count();
    let mut lines = vec![format!(
        "{} {}: {} widgets ({} enabled), {} categories, {} services",
        "✓".green(),
        args.config.display(),
        config.widgets.len(),
        enabled,
        config.categories.len(),
        config.services().len()
    )];

    for widget in &config.widgets {
        if widget.widget_type.parse::<WidgetKind>().is_err() {
            lines.push(format!(
                "{} widget '{}' has unknown type '{}' and will be skipped",
                "!".yellow(),
                widget.name,
                widget.widget_type
            ));
        }
    }

    Ok(lines.join("\n"))
}
