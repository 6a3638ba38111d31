pub mod dispatch;
pub mod inspect;
pub mod model;
pub mod rebind;
pub mod registry;
pub mod settings;
pub mod store;
pub mod view;

use bevy::prelude::*;

pub use dispatch::{CellEditor, CellPainter, PaintFn, WidgetDispatchRegistry};
pub use inspect::{PropertyHost, PropertyInfo, PropertyKind, inspect_object, write_back};
pub use model::{CellAddress, GridNode, Listener, NodeId, PropertyChanged, SchemaModel, SubscriptionId};
pub use rebind::{BindOutcome, BoundGrid, RebindController, RegistryFactory};
pub use registry::GridRegistry;
pub use settings::GridSettings;
pub use store::PropertyValueStore;
pub use view::{GridView, HeadlessGridView};

pub use gridbind_schema as schema;
pub use gridbind_widgets as widgets;

/// Makes the grid settings available to the app. Build grids with
/// [`GridRegistry::from_world`] so they pick the settings up.
#[derive(Default)]
pub struct PropertyGridPlugin {
    pub settings: GridSettings,
}

impl Plugin for PropertyGridPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone());
    }
}
