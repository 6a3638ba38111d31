use bevy::prelude::*;
use gridbind_schema::{PropertyValue, WidgetType};

use crate::adapter::{Edit, EditorAdapter};
use crate::collaborators::EditorContext;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorSize {
    Vec2,
    #[default]
    Vec3,
}

impl VectorSize {
    pub fn count(&self) -> usize {
        match self {
            Self::Vec2 => 2,
            Self::Vec3 => 3,
        }
    }

    pub fn axis_label(&self, index: usize) -> &'static str {
        ["X", "Y", "Z"][..self.count()].get(index).copied().unwrap_or("")
    }
}

/// Per-axis expression fields. Commits only when every axis evaluates.
#[derive(Clone, Debug)]
pub struct VectorEdit {
    pub size: VectorSize,
    axes: [String; 3],
}

impl VectorEdit {
    pub fn new(size: VectorSize) -> Self {
        Self {
            size,
            axes: Default::default(),
        }
    }

    pub fn axis(&self, index: usize) -> Option<&str> {
        self.axes[..self.size.count()].get(index).map(String::as_str)
    }
}

impl EditorAdapter for VectorEdit {
    fn widget_type(&self) -> WidgetType {
        match self.size {
            VectorSize::Vec2 => WidgetType::Vector2,
            VectorSize::Vec3 => WidgetType::Vector3,
        }
    }

    fn load(&mut self, value: &PropertyValue) {
        let components = match (self.size, value) {
            (VectorSize::Vec2, PropertyValue::Vec2(v)) => vec![v.x, v.y],
            (VectorSize::Vec3, PropertyValue::Vec3(v)) => vec![v.x, v.y, v.z],
            _ => return,
        };
        for (axis, component) in self.axes.iter_mut().zip(components) {
            *axis = component.to_string();
        }
    }

    fn display(&self) -> String {
        self.axes[..self.size.count()].join(",")
    }

    fn apply(&mut self, edit: Edit, _context: &EditorContext) -> bool {
        match edit {
            Edit::Axis(index, text) if index < self.size.count() => {
                self.axes[index] = text;
                true
            }
            Edit::Text(text) => {
                let parts: Vec<&str> = text.split(',').collect();
                if parts.len() != self.size.count() {
                    return false;
                }
                for (axis, part) in self.axes.iter_mut().zip(parts) {
                    *axis = part.trim().to_string();
                }
                true
            }
            _ => false,
        }
    }

    fn parse(&self, context: &EditorContext) -> Option<PropertyValue> {
        let mut components = [0.0f32; 3];
        for (slot, axis) in components.iter_mut().zip(&self.axes[..self.size.count()]) {
            *slot = context.evaluate(axis)? as f32;
        }
        let [x, y, z] = components;
        Some(match self.size {
            VectorSize::Vec2 => PropertyValue::Vec2(Vec2::new(x, y)),
            VectorSize::Vec3 => PropertyValue::Vec3(Vec3::new(x, y, z)),
        })
    }
}
