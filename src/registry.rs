use std::collections::HashMap;

use bevy::prelude::*;
use gridbind_schema::PropertyValue;

use crate::rebind::RebindController;
use crate::settings::GridSettings;

/// Live grids of an application, addressed by name.
#[derive(Default)]
pub struct GridRegistry {
    settings: GridSettings,
    grids: HashMap<String, RebindController>,
}

impl GridRegistry {
    pub fn new(settings: GridSettings) -> Self {
        Self {
            settings,
            grids: HashMap::new(),
        }
    }

    /// A registry using the app's [`GridSettings`], or the defaults when none were inserted.
    pub fn from_world(world: &World) -> Self {
        Self::new(world.get_resource::<GridSettings>().cloned().unwrap_or_default())
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// The controller for `grid`, created on first use.
    pub fn controller_mut(&mut self, grid: &str) -> &mut RebindController {
        let settings = &self.settings;
        self.grids
            .entry(grid.to_string())
            .or_insert_with(|| RebindController::new(settings.clone()))
    }

    pub fn controller(&self, grid: &str) -> Option<&RebindController> {
        self.grids.get(grid)
    }

    pub fn remove(&mut self, grid: &str) -> Option<RebindController> {
        self.grids.remove(grid)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.grids.keys().map(String::as_str)
    }

    pub fn set_value(&self, grid: &str, property: &str, value: PropertyValue) -> bool {
        match self.grids.get(grid) {
            Some(controller) => controller.set_value(property, value),
            None => {
                warn!("No grid named '{grid}'");
                false
            }
        }
    }

    pub fn value(&self, grid: &str, property: &str) -> Option<PropertyValue> {
        self.grids.get(grid)?.value(property)
    }
}
