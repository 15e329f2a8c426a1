//! Structured logging helpers
//!
//! Filter construction for the tracing subscriber and the request ID
//! middleware applied to every HTTP request.

pub mod middleware;

pub use middleware::{generate_request_id, propagate_request_id, REQUEST_ID_HEADER};

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
///
/// # Examples
///
/// ```
/// use labdash::config::LoggingConfig;
/// use labdash::logging::build_filter_directives;
///
/// let config = LoggingConfig::default().with_component("aggregator", "debug");
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "info,labdash::aggregator=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    for (component, level) in &config.component_levels {
        filter_str.push_str(&format!(",labdash::{}={}", component, level));
    }

    filter_str
}
