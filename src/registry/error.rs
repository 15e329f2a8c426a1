/// Errors that can occur while building the widget registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown widget type '{widget_type}' for widget '{name}'")]
    UnknownType { name: String, widget_type: String },
}
