use gridbind_schema::{PropertyValue, WidgetType};

use crate::adapter::{Edit, EditorAdapter};
use crate::collaborators::EditorContext;

/// Spec parameter that makes a text cell read-only.
pub const READ_ONLY_PARAM: &str = "readonly";

/// Free text, committed verbatim.
#[derive(Clone, Debug, Default)]
pub struct TextEdit {
    pub read_only: bool,
    /// Set when the editor stands in for the host view's own editor.
    pub native: bool,
    text: String,
}

impl TextEdit {
    pub fn new(read_only: bool) -> Self {
        Self {
            read_only,
            ..Default::default()
        }
    }

    pub fn native() -> Self {
        Self {
            native: true,
            ..Default::default()
        }
    }
}

impl EditorAdapter for TextEdit {
    fn widget_type(&self) -> WidgetType {
        if self.native {
            WidgetType::Default
        } else {
            WidgetType::String
        }
    }

    fn load(&mut self, value: &PropertyValue) {
        self.text = value.to_string();
    }

    fn display(&self) -> String {
        self.text.clone()
    }

    fn apply(&mut self, edit: Edit, _context: &EditorContext) -> bool {
        match edit {
            Edit::Text(text) if !self.read_only => {
                self.text = text;
                true
            }
            _ => false,
        }
    }

    fn parse(&self, _context: &EditorContext) -> Option<PropertyValue> {
        if self.read_only {
            return None;
        }
        Some(PropertyValue::String(self.text.clone()))
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
