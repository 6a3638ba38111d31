use bevy::prelude::*;
use gridbind_schema::{PropertyValue, ValueKind, WidgetType};

use crate::adapter::{Edit, EditorAdapter};
use crate::collaborators::EditorContext;

#[derive(Clone, Debug)]
pub struct ColorPicker {
    pub color: Color,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self { color: Color::WHITE }
    }
}

impl EditorAdapter for ColorPicker {
    fn widget_type(&self) -> WidgetType {
        WidgetType::ColorSelect
    }

    fn load(&mut self, value: &PropertyValue) {
        if let PropertyValue::Color(color) = value {
            self.color = *color;
        }
    }

    fn display(&self) -> String {
        PropertyValue::Color(self.color).to_string()
    }

    fn apply(&mut self, edit: Edit, _context: &EditorContext) -> bool {
        match edit {
            Edit::Color(color) => {
                self.color = color;
                true
            }
            Edit::Text(hex) => match PropertyValue::parse_as(ValueKind::Color, &hex) {
                Some(PropertyValue::Color(color)) => {
                    self.color = color;
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn parse(&self, _context: &EditorContext) -> Option<PropertyValue> {
        Some(PropertyValue::Color(self.color))
    }
}
