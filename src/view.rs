use std::collections::BTreeSet;

use crate::model::NodeId;
use crate::rebind::BoundGrid;

/// A view that displays one bound model and registry pair at a time.
pub trait GridView {
    fn attach(&mut self, grid: &BoundGrid);
    fn detach(&mut self);
}

/// View without any rendering. Keeps the UI state a real view would lose on
/// rebuild, so bind flows can be driven from tools and tests.
#[derive(Default)]
pub struct HeadlessGridView {
    grid: Option<BoundGrid>,
    last: Option<BoundGrid>,
    attach_count: usize,
    expanded: BTreeSet<NodeId>,
    scroll: f32,
}

impl HeadlessGridView {
    pub fn grid(&self) -> Option<&BoundGrid> {
        self.grid.as_ref()
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    pub fn set_expanded(&mut self, node: NodeId, expanded: bool) {
        if expanded {
            self.expanded.insert(node);
        } else {
            self.expanded.remove(&node);
        }
    }

    pub fn is_expanded(&self, node: NodeId) -> bool {
        self.expanded.contains(&node)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn set_scroll(&mut self, offset: f32) {
        self.scroll = offset.max(0.0);
    }

    /// Drain the nodes that need repainting.
    pub fn refresh(&mut self) -> Vec<NodeId> {
        match &self.grid {
            Some(grid) => grid.model.borrow_mut().take_dirty(),
            None => Vec::new(),
        }
    }
}

impl GridView for HeadlessGridView {
    fn attach(&mut self, grid: &BoundGrid) {
        let same = self.last.as_ref().is_some_and(|last| last.same_pair(grid));
        if !same {
            self.expanded.clear();
            self.scroll = 0.0;
        }
        self.attach_count += 1;
        self.grid = Some(grid.clone());
        self.last = Some(grid.clone());
    }

    fn detach(&mut self) {
        self.grid = None;
    }
}
