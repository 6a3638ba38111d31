use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::Rc;

use bevy::prelude::*;
use gridbind_schema::{
    Constraint, MAX_DEPTH, PropertyValue, SchemaDocument, SchemaError, SchemaItem, WidgetSpec,
};

use crate::store::PropertyValueStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Grid coordinates of a cell relative to its parent group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub row: u32,
    pub column: u32,
}

/// One parsed schema item.
#[derive(Clone, Debug)]
pub struct GridNode {
    pub text: String,
    pub address: CellAddress,
    pub bold: bool,
    pub tooltip: String,
    pub widget: WidgetSpec,
    pub property: Option<String>,
    pub constraint: Option<Constraint>,
    pub enabled: bool,
    pub depth: usize,
    /// Position of the node's row among its parent's rows, in document order.
    pub visual_row: u32,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Emitted once per effective [`SchemaModel::set_value`].
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChanged {
    pub property: String,
    pub value: PropertyValue,
    /// Address of the bound cell, `None` for values without one.
    pub cell: Option<CellAddress>,
}

pub type Listener = Rc<dyn Fn(&PropertyChanged)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Tree of grid nodes parsed from a schema document, plus the values bound to it.
///
/// Listeners run synchronously inside [`set_value`](Self::set_value) and must
/// not call back into the model that is notifying them.
#[derive(Default)]
pub struct SchemaModel {
    headers: Vec<String>,
    nodes: Vec<GridNode>,
    roots: Vec<NodeId>,
    by_property: HashMap<String, NodeId>,
    /// Referenced property -> nodes whose constraint reads it.
    dependents: HashMap<String, Vec<NodeId>>,
    store: PropertyValueStore,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    dirty: Vec<NodeId>,
}

impl SchemaModel {
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let document = SchemaDocument::from_text(text)?;
        Ok(Self::from_document(&document))
    }

    /// Like [`parse`](Self::parse), but a malformed document yields an empty model.
    pub fn parse_or_empty(text: &str) -> Self {
        match Self::parse(text) {
            Ok(model) => model,
            Err(err) => {
                error!("Failed to parse property schema: {err}");
                Self::default()
            }
        }
    }

    pub fn from_document(document: &SchemaDocument) -> Self {
        let mut model = Self {
            headers: document.headers.clone(),
            ..Default::default()
        };
        let mut rows = [0u32; MAX_DEPTH];
        for item in &document.items {
            let id = model.insert(item, None, 0, &mut rows);
            model.roots.push(id);
        }
        model
    }

    fn insert(
        &mut self,
        item: &SchemaItem,
        parent: Option<NodeId>,
        depth: usize,
        rows: &mut [u32; MAX_DEPTH],
    ) -> NodeId {
        let slot = depth.min(MAX_DEPTH - 1);
        let id = NodeId(self.nodes.len());

        let property = (!item.property.is_empty()).then(|| item.property.clone());
        let text = match property {
            Some(_) => item.text.clone(),
            None => display_label(&item.text),
        };
        // A column-0 cell opens a row; the other cells of that row share it.
        let visual_row = if item.col == 0 {
            rows[slot]
        } else {
            rows[slot].saturating_sub(1)
        };

        if let Some(name) = &property {
            match self.by_property.entry(name.clone()) {
                Entry::Occupied(_) => {
                    error!("Property '{name}' is bound to more than one cell, keeping the first");
                }
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
            }
        }
        let constraint = item.constraint.clone().filter(|c| !c.is_empty());
        if let Some(constraint) = &constraint {
            for referenced in constraint.referenced() {
                self.dependents.entry(referenced.to_string()).or_default().push(id);
            }
        }

        let mut node = GridNode {
            text,
            address: CellAddress {
                row: item.row,
                column: item.col,
            },
            bold: item.bold,
            tooltip: item.tooltip.clone(),
            widget: WidgetSpec::parse(&item.widget),
            property,
            constraint,
            enabled: true,
            depth,
            visual_row,
            parent,
            children: Vec::new(),
        };
        node.enabled = self.constraint_holds(&node);
        self.nodes.push(node);

        if let Some(child_rows) = rows.get_mut(slot + 1) {
            *child_rows = 0;
        }
        for child in &item.children {
            let child_id = self.insert(child, Some(id), depth + 1, rows);
            self.nodes[id.0].children.push(child_id);
        }

        if item.col == 0 {
            rows[slot] += 1;
        }
        id
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&GridNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GridNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn node_for_property(&self, name: &str) -> Option<NodeId> {
        self.by_property.get(name).copied()
    }

    pub fn find_value(&self, name: &str) -> Option<&PropertyValue> {
        self.store.get(name)
    }

    pub fn values(&self) -> &PropertyValueStore {
        &self.store
    }

    /// Store a value, refresh the bound cell and dependent constraints, then
    /// notify listeners. Returns `false` when the value was already current.
    pub fn set_value(&mut self, name: &str, value: PropertyValue) -> bool {
        if !self.store.set(name, value.clone()) {
            return false;
        }

        let cell = match self.by_property.get(name) {
            Some(&id) => {
                let node = &mut self.nodes[id.0];
                node.text = value.to_string();
                self.dirty.push(id);
                Some(node.address)
            }
            None => {
                debug!("Value '{name}' has no bound cell");
                None
            }
        };
        self.refresh_constraints(name);

        let change = PropertyChanged {
            property: name.to_string(),
            value,
            cell,
        };
        for (_, listener) in &self.listeners {
            listener(&change);
        }
        true
    }

    fn refresh_constraints(&mut self, changed: &str) {
        let Some(dependents) = self.dependents.get(changed) else {
            return;
        };
        for &id in dependents {
            let enabled = self.constraint_holds(&self.nodes[id.0]);
            let node = &mut self.nodes[id.0];
            if node.enabled != enabled {
                node.enabled = enabled;
                self.dirty.push(id);
            }
        }
    }

    /// Recompute the enabled state of every constrained node.
    pub fn evaluate_constraints(&mut self) {
        for index in 0..self.nodes.len() {
            let enabled = self.constraint_holds(&self.nodes[index]);
            let node = &mut self.nodes[index];
            if node.enabled != enabled {
                node.enabled = enabled;
                self.dirty.push(NodeId(index));
            }
        }
    }

    /// Every referenced property must currently hold one of its allowed values.
    fn constraint_holds(&self, node: &GridNode) -> bool {
        let Some(constraint) = &node.constraint else {
            return true;
        };
        constraint.referenced().all(|property| {
            self.store
                .get(property)
                .is_some_and(|value| constraint.allows(property, &value.to_string()))
        })
    }

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Nodes whose text or enabled state changed since the last call.
    pub fn take_dirty(&mut self) -> Vec<NodeId> {
        let mut dirty = std::mem::take(&mut self.dirty);
        dirty.sort_unstable();
        dirty.dedup();
        dirty
    }
}

/// Last path segment of `text` with its first character upper-cased.
fn display_label(text: &str) -> String {
    let segment = match text.rsplit(['.', '/']).next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => text,
    };
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
