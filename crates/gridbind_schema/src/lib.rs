pub mod builder;
pub mod error;
pub mod format;
pub mod types;
pub mod widget_spec;

// Re-export core types for consumer convenience
pub use builder::{ItemEntry, MAX_DEPTH, SchemaBuilder, VALUE_COLUMN, secondary_key};
pub use error::SchemaError;
pub use format::{Constraint, SchemaDocument, SchemaItem};
pub use types::{PropertyValue, ValueKind, ValueMap};
pub use widget_spec::{WidgetSpec, WidgetType};
