use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;
use gridbind_schema::{PropertyValue, SchemaBuilder, ValueMap};
use gridbind_widgets::ObjectId;

use crate::dispatch::WidgetDispatchRegistry;
use crate::model::{Listener, SchemaModel, SubscriptionId};
use crate::settings::GridSettings;
use crate::view::GridView;

/// A model and the registry that edits it, replaced together on rebuild.
#[derive(Clone)]
pub struct BoundGrid {
    pub model: Rc<RefCell<SchemaModel>>,
    pub dispatch: Rc<WidgetDispatchRegistry>,
}

impl BoundGrid {
    pub fn same_pair(&self, other: &BoundGrid) -> bool {
        Rc::ptr_eq(&self.model, &other.model) && Rc::ptr_eq(&self.dispatch, &other.dispatch)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    Reused,
    Rebuilt,
}

pub type RegistryFactory = Rc<dyn Fn() -> WidgetDispatchRegistry>;

/// Keeps a view bound to the grid for the current schema and target, and
/// rebuilds the pair only when either changes.
pub struct RebindController {
    bound: Option<BoundGrid>,
    schema_text: String,
    target: Option<ObjectId>,
    subscription: Option<SubscriptionId>,
    make_registry: RegistryFactory,
}

impl Default for RebindController {
    fn default() -> Self {
        Self::new(GridSettings::default())
    }
}

impl RebindController {
    pub fn new(settings: GridSettings) -> Self {
        Self::with_registry_factory(Rc::new(move || {
            WidgetDispatchRegistry::with_builtins(settings.clone())
        }))
    }

    /// Use `make_registry` for every rebuilt pair, e.g. to add host widget types.
    pub fn with_registry_factory(make_registry: RegistryFactory) -> Self {
        Self {
            bound: None,
            schema_text: String::new(),
            target: None,
            subscription: None,
            make_registry,
        }
    }

    pub fn bind(
        &mut self,
        schema_text: &str,
        initial_values: &ValueMap,
        target: Option<ObjectId>,
        view: &mut dyn GridView,
        listener: Option<Listener>,
    ) -> BindOutcome {
        self.release_subscription();

        let unchanged = self.bound.is_some() && self.schema_text == schema_text && self.target == target;
        let outcome = if unchanged {
            debug!("Schema and target unchanged, keeping bound grid");
            BindOutcome::Reused
        } else {
            self.rebuild(schema_text, initial_values, target, view);
            BindOutcome::Rebuilt
        };

        if let (Some(listener), Some(grid)) = (listener, &self.bound) {
            self.subscription = Some(grid.model.borrow_mut().subscribe(listener));
        }
        outcome
    }

    fn rebuild(
        &mut self,
        schema_text: &str,
        initial_values: &ValueMap,
        target: Option<ObjectId>,
        view: &mut dyn GridView,
    ) {
        if self.bound.take().is_some() {
            view.detach();
        }

        let grid = BoundGrid {
            model: Rc::new(RefCell::new(SchemaModel::parse_or_empty(schema_text))),
            dispatch: Rc::new((self.make_registry)()),
        };
        view.attach(&grid);
        {
            let mut model = grid.model.borrow_mut();
            for (name, value) in initial_values {
                model.set_value(name, value.clone());
            }
            model.evaluate_constraints();
        }
        info!(
            "Rebuilt property grid with {} values for target {:?}",
            initial_values.len(),
            target
        );

        self.bound = Some(grid);
        self.schema_text = schema_text.to_string();
        self.target = target;
    }

    /// Bind the builder's document, then clear the builder and reset its
    /// layout counters for the next session.
    pub fn apply(
        &mut self,
        builder: &mut SchemaBuilder,
        target: Option<ObjectId>,
        view: &mut dyn GridView,
        listener: Option<Listener>,
    ) -> BindOutcome {
        let text = builder.result();
        let values = builder.initial_values().clone();
        let outcome = self.bind(&text, &values, target, view, listener);
        builder.clear();
        builder.reset_layout();
        outcome
    }

    pub fn unbind(&mut self, view: &mut dyn GridView) {
        self.release_subscription();
        if self.bound.take().is_some() {
            view.detach();
        }
        self.schema_text.clear();
        self.target = None;
    }

    fn release_subscription(&mut self) {
        let (Some(id), Some(grid)) = (self.subscription.take(), &self.bound) else {
            return;
        };
        match grid.model.try_borrow_mut() {
            Ok(mut model) => {
                model.unsubscribe(id);
            }
            Err(_) => error!("Grid model is busy, listener {id:?} could not be removed"),
        }
    }

    pub fn grid(&self) -> Option<&BoundGrid> {
        self.bound.as_ref()
    }

    pub fn target(&self) -> Option<ObjectId> {
        self.target
    }

    pub fn value(&self, property: &str) -> Option<PropertyValue> {
        let grid = self.bound.as_ref()?;
        grid.model.borrow().find_value(property).cloned()
    }

    /// Listeners run inside this call and must not read the grid back.
    pub fn set_value(&self, property: &str, value: PropertyValue) -> bool {
        match &self.bound {
            Some(grid) => grid.model.borrow_mut().set_value(property, value),
            None => {
                warn!("No grid bound, dropping value for '{property}'");
                false
            }
        }
    }
}

impl Drop for RebindController {
    fn drop(&mut self) {
        self.release_subscription();
    }
}
