use std::rc::Rc;

use bevy::prelude::*;
use gridbind_schema::{PropertyValue, WidgetSpec, WidgetType};

use crate::collaborators::EditorContext;

/// Raw user input delivered to an editor.
#[derive(Clone, Debug, PartialEq)]
pub enum Edit {
    /// Replace the whole text of the field.
    Text(String),
    /// Replace the text of one vector component.
    Axis(usize, String),
    Toggle,
    Select(usize),
    Color(Color),
    /// Open the chooser associated with the editor.
    Browse,
}

/// Value conversion behind one grid cell editor.
///
/// Adapters hold only the pending edit. Committing the parsed value to the
/// store is the job of the cell editor that owns the adapter.
pub trait EditorAdapter {
    fn widget_type(&self) -> WidgetType;

    /// Load the stored value into the pending edit state.
    fn load(&mut self, value: &PropertyValue);

    /// Text shown in the editor for the pending state.
    fn display(&self) -> String;

    /// Feed user input. Returns `false` when the adapter ignores it.
    fn apply(&mut self, edit: Edit, context: &EditorContext) -> bool;

    /// Convert the pending state into a value; `None` discards the edit.
    fn parse(&self, context: &EditorContext) -> Option<PropertyValue>;

    fn is_read_only(&self) -> bool {
        false
    }
}

pub type AdapterFactory = Rc<dyn Fn(&WidgetSpec, &str, &EditorContext) -> Box<dyn EditorAdapter>>;
