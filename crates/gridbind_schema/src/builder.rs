use bevy::prelude::*;

use crate::error::SchemaError;
use crate::format::{Constraint, SchemaDocument, SchemaItem};
use crate::types::{PropertyValue, ValueMap};
use crate::widget_spec::{SPEC_SEPARATOR, WidgetType};

/// Deepest group nesting the row counters track.
pub const MAX_DEPTH: usize = 25;

/// Column of the value cell produced by [`SchemaBuilder::add_item`].
pub const VALUE_COLUMN: u32 = 1;

/// Key of a secondary cell: `<property>_co_<column>`.
pub fn secondary_key(property: &str, column: u32) -> String {
    format!("{property}_co_{column}")
}

#[derive(Clone, Copy, Debug)]
struct LastRow {
    row: u32,
    next_col: u32,
}

/// Emits a schema document plus typed initial values from a flat sequence of calls.
///
/// Rows are assigned from per-depth counters, so the same call sequence always
/// produces byte-identical text.
#[derive(Debug)]
pub struct SchemaBuilder {
    document: SchemaDocument,
    open: Vec<SchemaItem>,
    rows: [u32; MAX_DEPTH],
    depth: usize,
    /// Groups opened past `MAX_DEPTH` that are still waiting for their `end_group`.
    flattened: usize,
    values: ValueMap,
    last_row: Option<LastRow>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            document: SchemaDocument::default(),
            open: Vec::new(),
            rows: [0; MAX_DEPTH],
            depth: 0,
            flattened: 0,
            values: ValueMap::new(),
            last_row: None,
        }
    }

    pub fn set_headers(&mut self, headers: &[&str]) -> Result<(), SchemaError> {
        if !(2..=4).contains(&headers.len()) {
            return Err(SchemaError::HeaderCount(headers.len()));
        }
        self.document.headers = headers.iter().map(|h| h.to_string()).collect();
        Ok(())
    }

    /// Open a group; following rows nest under it until [`end_group`](Self::end_group).
    ///
    /// Past [`MAX_DEPTH`] the group is flattened: its label becomes a bold row
    /// at the deepest level and its contents stay at that level.
    pub fn begin_group(&mut self, label: &str) {
        let row = self.take_row();
        let group = SchemaItem {
            text: label.to_string(),
            row,
            bold: true,
            ..Default::default()
        };
        self.last_row = None;

        if self.depth + 1 >= MAX_DEPTH {
            debug_assert!(false, "group nesting deeper than {MAX_DEPTH}");
            warn!("Group '{label}' nested deeper than {MAX_DEPTH}, flattening");
            self.items_mut().push(group);
            self.flattened += 1;
            return;
        }
        self.open.push(group);
        self.depth += 1;
        self.rows[self.depth] = 0;
    }

    pub fn end_group(&mut self) {
        if self.flattened > 0 {
            self.flattened -= 1;
            self.last_row = None;
            return;
        }
        if self.open.is_empty() && self.depth == 0 {
            debug_assert!(false, "{}", SchemaError::UnbalancedGroup);
            warn!("{}", SchemaError::UnbalancedGroup);
            return;
        }
        if let Some(group) = self.open.pop() {
            self.items_mut().push(group);
        }
        self.rows[self.depth] = 0;
        self.depth = self.depth.saturating_sub(1);
        self.rows[self.depth] = 0;
        self.last_row = None;
    }

    /// Add a labelled row whose value cell is edited with `widget`.
    pub fn add_item(
        &mut self,
        property: &str,
        value: impl Into<PropertyValue>,
        widget: WidgetType,
    ) -> ItemEntry<'_> {
        self.push_row(property, value.into(), widget.tag())
    }

    /// Add a labelled row whose value cell has no editor.
    pub fn add_display_item(&mut self, property: &str, value: impl Into<PropertyValue>) -> ItemEntry<'_> {
        self.push_row(property, value.into(), "")
    }

    /// Attach another editable cell to the row most recently produced by
    /// [`add_item`](Self::add_item). Returns `None` when there is no such row.
    pub fn add_secondary_column(
        &mut self,
        property: &str,
        value: impl Into<PropertyValue>,
        widget: WidgetType,
    ) -> Option<ItemEntry<'_>> {
        let Some(last) = self.last_row.as_mut() else {
            warn!("Secondary column '{property}' has no row to attach to");
            return None;
        };
        let (row, col) = (last.row, last.next_col);
        last.next_col += 1;

        let value = value.into();
        let key = secondary_key(property, col);
        let cell = SchemaItem {
            text: value.to_string(),
            row,
            col,
            widget: widget.tag().to_string(),
            property: key.clone(),
            ..Default::default()
        };
        self.values.entry(key).or_insert(value);

        let items = self.items_mut();
        items.push(cell);
        let start = items.len() - 1;
        Some(ItemEntry { cells: &mut items[start..] })
    }

    /// The finished schema text. Open groups are closed in the output only.
    pub fn result(&self) -> String {
        let mut document = self.document.clone();
        let mut open = self.open.clone();
        while let Some(group) = open.pop() {
            match open.last_mut() {
                Some(parent) => parent.children.push(group),
                None => document.items.push(group),
            }
        }
        match document.to_text() {
            Ok(text) => text,
            Err(err) => {
                error!("Failed to serialize schema: {err}");
                String::new()
            }
        }
    }

    pub fn initial_values(&self) -> &ValueMap {
        &self.values
    }

    /// Discard accumulated items and values. Depth and row counters survive.
    pub fn clear(&mut self) {
        self.document = SchemaDocument::default();
        self.open.clear();
        self.values.clear();
        self.last_row = None;
    }

    /// Reset nesting depth and row counters.
    pub fn reset_layout(&mut self) {
        self.rows = [0; MAX_DEPTH];
        self.depth = 0;
        self.flattened = 0;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn take_row(&mut self) -> u32 {
        let row = self.rows[self.depth];
        self.rows[self.depth] += 1;
        row
    }

    fn items_mut(&mut self) -> &mut Vec<SchemaItem> {
        match self.open.last_mut() {
            Some(group) => &mut group.children,
            None => &mut self.document.items,
        }
    }

    fn push_row(&mut self, property: &str, value: PropertyValue, widget: &str) -> ItemEntry<'_> {
        let row = self.take_row();
        let label = SchemaItem {
            text: property.to_string(),
            row,
            ..Default::default()
        };
        let cell = SchemaItem {
            text: value.to_string(),
            row,
            col: VALUE_COLUMN,
            widget: widget.to_string(),
            property: property.to_string(),
            ..Default::default()
        };
        self.values.entry(property.to_string()).or_insert(value);
        self.last_row = Some(LastRow {
            row,
            next_col: VALUE_COLUMN + 1,
        });

        let items = self.items_mut();
        items.push(label);
        items.push(cell);
        let start = items.len() - 2;
        ItemEntry { cells: &mut items[start..] }
    }
}

/// Cells just produced by a builder call. The last cell is the editable one.
pub struct ItemEntry<'a> {
    cells: &'a mut [SchemaItem],
}

impl ItemEntry<'_> {
    /// Append widget parameters (comma separated) to the value cell's spec.
    pub fn params(self, params: &str) -> Self {
        if params.is_empty() {
            return self;
        }
        if let Some(cell) = self.cells.last_mut() {
            if !cell.widget.is_empty() {
                cell.widget.push(SPEC_SEPARATOR);
                cell.widget.push_str(params);
            }
        }
        self
    }

    pub fn tooltip(self, tooltip: &str) -> Self {
        for cell in self.cells.iter_mut() {
            cell.tooltip = tooltip.to_string();
        }
        self
    }

    /// Enable the value cell only while `property` holds one of `allowed`.
    pub fn constrain(self, property: &str, allowed: &[&str]) -> Self {
        if let Some(cell) = self.cells.last_mut() {
            cell.constraint
                .get_or_insert_with(Constraint::default)
                .insert(property, allowed);
        }
        self
    }

    pub fn bold(self) -> Self {
        if let Some(label) = self.cells.first_mut() {
            label.bold = true;
        }
        self
    }
}
