use gridbind_schema::{PropertyValue, ValueKind, WidgetType};

use crate::adapter::{Edit, EditorAdapter};
use crate::collaborators::EditorContext;

#[derive(Clone, Copy, Debug, Default)]
pub struct Checkbox {
    pub checked: bool,
}

impl EditorAdapter for Checkbox {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckBox
    }

    fn load(&mut self, value: &PropertyValue) {
        if let PropertyValue::Bool(checked) = value {
            self.checked = *checked;
        }
    }

    fn display(&self) -> String {
        self.checked.to_string()
    }

    fn apply(&mut self, edit: Edit, _context: &EditorContext) -> bool {
        match edit {
            Edit::Toggle => {
                self.checked = !self.checked;
                true
            }
            Edit::Text(text) => match PropertyValue::parse_as(ValueKind::Bool, &text) {
                Some(PropertyValue::Bool(checked)) => {
                    self.checked = checked;
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn parse(&self, _context: &EditorContext) -> Option<PropertyValue> {
        Some(PropertyValue::Bool(self.checked))
    }
}
