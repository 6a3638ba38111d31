//! Services the editors call into. The host application implements these;
//! the defaults here keep a grid usable in headless tools and tests.

use std::collections::BTreeSet;
use std::rc::Rc;

use anyhow::{Context as _, Result};

/// Evaluates the small arithmetic expressions users may type into numeric fields.
pub trait ExpressionEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64>;
}

/// Accepts plain numeric literals only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralEvaluator;

impl ExpressionEvaluator for LiteralEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64> {
        let expression = expression.trim();
        expression
            .parse::<f64>()
            .with_context(|| format!("'{expression}' is not a number"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChooserKind {
    /// Files under the project's resource root.
    Asset,
    /// Nodes of the scene the edited object lives in.
    Node,
    /// Live objects, returned as their numeric id.
    Object,
}

/// Opens a file, node or object picker and blocks until the user decides.
pub trait Chooser {
    /// Returns the chosen identifier or path, `None` when cancelled.
    fn choose(&self, kind: ChooserKind, filter: &str) -> Option<String>;

    fn choose_many(&self, kind: ChooserKind, filter: &str) -> Option<Vec<String>> {
        self.choose(kind, filter).map(|choice| vec![choice])
    }
}

/// A chooser that is always cancelled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoChooser;

impl Chooser for NoChooser {
    fn choose(&self, _kind: ChooserKind, _filter: &str) -> Option<String> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub i64);

/// Lookup of live engine objects by id.
pub trait ObjectRegistry {
    fn resolve_by_id(&self, id: i64) -> Option<ObjectId>;
    fn class_name_of(&self, object: ObjectId) -> Option<String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyRegistry;

impl ObjectRegistry for EmptyRegistry {
    fn resolve_by_id(&self, _id: i64) -> Option<ObjectId> {
        None
    }

    fn class_name_of(&self, _object: ObjectId) -> Option<String> {
        None
    }
}

// ---------------------------------------------------------------------------
// EditorContext
// ---------------------------------------------------------------------------

/// Everything an editor may need beyond its own widget spec.
#[derive(Clone)]
pub struct EditorContext {
    pub evaluator: Rc<dyn ExpressionEvaluator>,
    pub chooser: Rc<dyn Chooser>,
    pub objects: Rc<dyn ObjectRegistry>,
    read_only: BTreeSet<String>,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self {
            evaluator: Rc::new(LiteralEvaluator),
            chooser: Rc::new(NoChooser),
            objects: Rc::new(EmptyRegistry),
            read_only: BTreeSet::new(),
        }
    }
}

impl EditorContext {
    pub fn with_evaluator(mut self, evaluator: impl ExpressionEvaluator + 'static) -> Self {
        self.evaluator = Rc::new(evaluator);
        self
    }

    pub fn with_chooser(mut self, chooser: impl Chooser + 'static) -> Self {
        self.chooser = Rc::new(chooser);
        self
    }

    pub fn with_objects(mut self, objects: impl ObjectRegistry + 'static) -> Self {
        self.objects = Rc::new(objects);
        self
    }

    /// Mark a property as not editable through text editors.
    pub fn with_read_only(mut self, property: impl Into<String>) -> Self {
        self.read_only.insert(property.into());
        self
    }

    pub fn is_read_only(&self, property: &str) -> bool {
        self.read_only.contains(property)
    }

    pub fn evaluate(&self, expression: &str) -> Option<f64> {
        match self.evaluator.evaluate(expression) {
            Ok(value) if value.is_finite() => Some(value),
            Ok(value) => {
                bevy::log::debug!("Expression '{expression}' evaluated to {value}, ignoring");
                None
            }
            Err(err) => {
                bevy::log::debug!("Expression rejected: {err:#}");
                None
            }
        }
    }
}
