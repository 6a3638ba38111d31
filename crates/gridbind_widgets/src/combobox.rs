use gridbind_schema::{PropertyValue, WidgetSpec, WidgetType};

use crate::adapter::{Edit, EditorAdapter};
use crate::collaborators::EditorContext;

/// Fixed option list taken from the widget spec parameters.
#[derive(Clone, Debug, Default)]
pub struct ComboBox {
    pub options: Vec<String>,
    pub selected: Option<usize>,
}

impl ComboBox {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            selected: None,
        }
    }

    pub fn from_spec(spec: &WidgetSpec) -> Self {
        Self::new(spec.params.iter().filter(|p| !p.is_empty()).cloned().collect())
    }

    fn index_of(&self, text: &str) -> Option<usize> {
        self.options.iter().position(|o| o == text)
    }
}

impl EditorAdapter for ComboBox {
    fn widget_type(&self) -> WidgetType {
        WidgetType::ComboBox
    }

    fn load(&mut self, value: &PropertyValue) {
        self.selected = self.index_of(&value.to_string());
    }

    fn display(&self) -> String {
        self.selected
            .and_then(|i| self.options.get(i))
            .cloned()
            .unwrap_or_default()
    }

    fn apply(&mut self, edit: Edit, _context: &EditorContext) -> bool {
        let index = match edit {
            Edit::Select(index) if index < self.options.len() => index,
            Edit::Text(text) => match self.index_of(&text) {
                Some(index) => index,
                None => return false,
            },
            _ => return false,
        };
        self.selected = Some(index);
        true
    }

    fn parse(&self, _context: &EditorContext) -> Option<PropertyValue> {
        let option = self.options.get(self.selected?)?;
        Some(PropertyValue::String(option.clone()))
    }
}
