//! Widget registry
//!
//! Builds one adapter per configured widget from a configuration snapshot.
//! A registry is immutable once built; a configuration reload builds a new
//! one, so adapters never outlive the configuration they were made from.

mod error;
mod factory;

pub use error::*;
pub use factory::create_adapter;

use crate::client::SharedClient;
use crate::config::WidgetConfig;
use crate::widgets::WidgetAdapter;
use serde::Serialize;
use std::sync::Arc;

/// A configured widget that could not be turned into an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedWidget {
    pub name: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub reason: String,
}

/// Ordered set of widget adapters, keyed by widget name.
#[derive(Default)]
pub struct WidgetRegistry {
    widgets: Vec<Arc<dyn WidgetAdapter>>,
    skipped: Vec<SkippedWidget>,
}

impl WidgetRegistry {
    /// Build adapters for `configs`, in configuration order.
    ///
    /// Unknown types are skipped with a warning. When two entries share a
    /// name the later one replaces the earlier adapter but keeps its
    /// position.
    pub fn build(configs: &[Arc<WidgetConfig>], client: &SharedClient) -> Self {
        let mut registry = Self::default();

        for config in configs {
            match create_adapter(Arc::clone(config), client) {
                Ok(adapter) => registry.insert(adapter),
                Err(e) => {
                    tracing::warn!(
                        widget = %config.name,
                        widget_type = %config.widget_type,
                        "Skipping widget: {}",
                        e
                    );
                    registry.skipped.push(SkippedWidget {
                        name: config.name.clone(),
                        widget_type: config.widget_type.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            widgets = registry.widgets.len(),
            skipped = registry.skipped.len(),
            "Widget registry built"
        );

        registry
    }

    /// Registry over already constructed adapters, with the same name
    /// collision policy as [`build`](Self::build).
    pub fn from_adapters(adapters: impl IntoIterator<Item = Arc<dyn WidgetAdapter>>) -> Self {
        let mut registry = Self::default();
        for adapter in adapters {
            registry.insert(adapter);
        }
        registry
    }

    fn insert(&mut self, adapter: Arc<dyn WidgetAdapter>) {
        match self.position(adapter.name()) {
            Some(index) => {
                tracing::warn!(
                    widget = %adapter.name(),
                    "Duplicate widget name, the later entry replaces the earlier one"
                );
                self.widgets[index] = adapter;
            }
            None => self.widgets.push(adapter),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.widgets.iter().position(|w| w.name() == name)
    }

    /// Enabled adapters in configuration order.
    pub fn enabled_widgets(&self) -> Vec<Arc<dyn WidgetAdapter>> {
        self.widgets
            .iter()
            .filter(|w| w.is_enabled())
            .cloned()
            .collect()
    }

    /// Look up an adapter by exact widget name.
    pub fn find(&self, name: &str) -> Option<Arc<dyn WidgetAdapter>> {
        self.position(name).map(|i| Arc::clone(&self.widgets[i]))
    }

    /// All adapters, enabled or not.
    pub fn all(&self) -> &[Arc<dyn WidgetAdapter>] {
        &self.widgets
    }

    /// Entries rejected at build time.
    pub fn skipped(&self) -> &[SkippedWidget] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.widgets.iter().filter(|w| w.is_enabled()).count()
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.widgets.iter().map(|w| w.name()).collect();
        f.debug_struct("WidgetRegistry")
            .field("widgets", &names)
            .field("skipped", &self.skipped)
            .finish()
    }
}
