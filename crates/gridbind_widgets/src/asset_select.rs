use gridbind_schema::{PropertyValue, WidgetSpec, WidgetType};

use crate::adapter::{Edit, EditorAdapter};
use crate::collaborators::{ChooserKind, EditorContext};

/// Separator between paths of a multi-asset value and between extension filters.
pub const PATH_LIST_SEPARATOR: &str = "|";

// ---------------------------------------------------------------------------
// AssetSelect
// ---------------------------------------------------------------------------

/// Resource path field, optionally restricted to a set of extensions.
#[derive(Clone, Debug, Default)]
pub struct AssetSelect {
    pub multi: bool,
    /// Accepted extensions such as `.png`. Empty accepts everything.
    pub extensions: Vec<String>,
    path: String,
}

impl AssetSelect {
    pub fn from_spec(spec: &WidgetSpec, multi: bool) -> Self {
        let extensions = spec
            .params
            .iter()
            .flat_map(|p| p.split(PATH_LIST_SEPARATOR))
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self {
            multi,
            extensions,
            path: String::new(),
        }
    }

    pub fn accepts(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.extensions.is_empty() || self.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
    }

    fn filter(&self) -> String {
        self.extensions.join(PATH_LIST_SEPARATOR)
    }

    fn set_paths(&mut self, paths: &[String]) -> bool {
        if paths.is_empty() || (!self.multi && paths.len() > 1) {
            return false;
        }
        if let Some(rejected) = paths.iter().find(|p| !self.accepts(p)) {
            bevy::log::debug!("'{rejected}' does not match filter '{}'", self.filter());
            return false;
        }
        self.path = paths.join(PATH_LIST_SEPARATOR);
        true
    }
}

impl EditorAdapter for AssetSelect {
    fn widget_type(&self) -> WidgetType {
        if self.multi {
            WidgetType::MultiAssetsSelect
        } else {
            WidgetType::AssetsSelect
        }
    }

    fn load(&mut self, value: &PropertyValue) {
        self.path = value.to_string();
    }

    fn display(&self) -> String {
        self.path.clone()
    }

    fn apply(&mut self, edit: Edit, context: &EditorContext) -> bool {
        match edit {
            Edit::Browse => {
                let chosen = if self.multi {
                    context.chooser.choose_many(ChooserKind::Asset, &self.filter())
                } else {
                    context
                        .chooser
                        .choose(ChooserKind::Asset, &self.filter())
                        .map(|path| vec![path])
                };
                chosen.is_some_and(|paths| self.set_paths(&paths))
            }
            Edit::Text(text) if text.is_empty() => {
                self.path.clear();
                true
            }
            Edit::Text(text) => {
                let paths: Vec<String> = text.split(PATH_LIST_SEPARATOR).map(str::to_string).collect();
                self.set_paths(&paths)
            }
            _ => false,
        }
    }

    fn parse(&self, _context: &EditorContext) -> Option<PropertyValue> {
        Some(PropertyValue::String(self.path.clone()))
    }
}

// ---------------------------------------------------------------------------
// NodeSelect
// ---------------------------------------------------------------------------

/// Path of a node in the edited object's scene.
#[derive(Clone, Debug, Default)]
pub struct NodeSelect {
    /// Chooser filter, usually the id of the object owning the path.
    pub scope: String,
    path: String,
}

impl NodeSelect {
    pub fn from_spec(spec: &WidgetSpec) -> Self {
        Self {
            scope: spec.param(0).unwrap_or_default().to_string(),
            path: String::new(),
        }
    }
}

impl EditorAdapter for NodeSelect {
    fn widget_type(&self) -> WidgetType {
        WidgetType::NodeSelect
    }

    fn load(&mut self, value: &PropertyValue) {
        self.path = value.to_string();
    }

    fn display(&self) -> String {
        self.path.clone()
    }

    fn apply(&mut self, edit: Edit, context: &EditorContext) -> bool {
        let path = match edit {
            Edit::Browse => match context.chooser.choose(ChooserKind::Node, &self.scope) {
                Some(path) => path,
                None => return false,
            },
            Edit::Text(path) => path,
            _ => return false,
        };
        self.path = path;
        true
    }

    fn parse(&self, _context: &EditorContext) -> Option<PropertyValue> {
        Some(PropertyValue::String(self.path.clone()))
    }
}

// ---------------------------------------------------------------------------
// ObjectSelect
// ---------------------------------------------------------------------------

/// Id of a live object whose class is one of the spec's class parameters.
/// `-1` means no object.
#[derive(Clone, Debug)]
pub struct ObjectSelect {
    pub classes: Vec<String>,
    id: i64,
}

impl ObjectSelect {
    pub const NONE: i64 = -1;

    pub fn from_spec(spec: &WidgetSpec) -> Self {
        Self {
            classes: spec
                .params
                .iter()
                .flat_map(|p| p.split(PATH_LIST_SEPARATOR))
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            id: Self::NONE,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    fn select(&mut self, text: &str, context: &EditorContext) -> bool {
        let Ok(id) = text.trim().parse::<i64>() else {
            return false;
        };
        if id == Self::NONE {
            self.id = id;
            return true;
        }
        let Some(object) = context.objects.resolve_by_id(id) else {
            bevy::log::debug!("No object with id {id}");
            return false;
        };
        let class = context.objects.class_name_of(object).unwrap_or_default();
        if !self.classes.is_empty() && !self.classes.contains(&class) {
            bevy::log::debug!("Object {id} is a '{class}', expected one of {:?}", self.classes);
            return false;
        }
        self.id = id;
        true
    }
}

impl EditorAdapter for ObjectSelect {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Res
    }

    fn load(&mut self, value: &PropertyValue) {
        if let PropertyValue::Int(id) = value {
            self.id = *id;
        }
    }

    fn display(&self) -> String {
        self.id.to_string()
    }

    fn apply(&mut self, edit: Edit, context: &EditorContext) -> bool {
        match edit {
            Edit::Browse => {
                let filter = self.classes.join(PATH_LIST_SEPARATOR);
                match context.chooser.choose(ChooserKind::Object, &filter) {
                    Some(choice) => self.select(&choice, context),
                    None => false,
                }
            }
            Edit::Text(text) => self.select(&text, context),
            _ => false,
        }
    }

    fn parse(&self, _context: &EditorContext) -> Option<PropertyValue> {
        Some(PropertyValue::Int(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{Chooser, ObjectId, ObjectRegistry};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Scripted {
        answers: RefCell<Vec<String>>,
        filters: RefCell<Vec<(ChooserKind, String)>>,
    }

    impl Chooser for Scripted {
        fn choose(&self, kind: ChooserKind, filter: &str) -> Option<String> {
            self.filters.borrow_mut().push((kind, filter.to_string()));
            self.answers.borrow_mut().pop()
        }

        fn choose_many(&self, kind: ChooserKind, filter: &str) -> Option<Vec<String>> {
            self.filters.borrow_mut().push((kind, filter.to_string()));
            let answers = std::mem::take(&mut *self.answers.borrow_mut());
            (!answers.is_empty()).then_some(answers)
        }
    }

    struct Scene;

    impl ObjectRegistry for Scene {
        fn resolve_by_id(&self, id: i64) -> Option<ObjectId> {
            (1..=2).contains(&id).then_some(ObjectId(id))
        }

        fn class_name_of(&self, object: ObjectId) -> Option<String> {
            Some(if object.0 == 1 { "Material" } else { "Mesh" }.to_string())
        }
    }

    fn chooser(answers: &[&str]) -> Scripted {
        Scripted {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn browse_commits_chosen_path_matching_filter() {
        let context = EditorContext::default().with_chooser(chooser(&["Res://hero.png"]));
        let mut select = AssetSelect::from_spec(&WidgetSpec::parse("AssetsSelect,.png|.jpg"), false);
        assert!(select.apply(Edit::Browse, &context));
        assert_eq!(select.parse(&context), Some(PropertyValue::from("Res://hero.png")));
    }

    #[test]
    fn filter_rejects_other_extensions() {
        let context = EditorContext::default();
        let mut select = AssetSelect::from_spec(&WidgetSpec::parse("AssetsSelect,.png"), false);
        select.load(&PropertyValue::from("Res://a.png"));
        assert!(!select.apply(Edit::Text("Res://a.wav".into()), &context));
        assert_eq!(select.display(), "Res://a.png");
        assert!(!select.apply(Edit::Text("Res://a.png|Res://b.png".into()), &context));
    }

    #[test]
    fn cancelled_chooser_leaves_value() {
        let context = EditorContext::default();
        let mut select = AssetSelect::from_spec(&WidgetSpec::parse("AssetsSelect"), false);
        select.load(&PropertyValue::from("Res://keep.ogg"));
        assert!(!select.apply(Edit::Browse, &context));
        assert_eq!(select.display(), "Res://keep.ogg");
    }

    #[test]
    fn multi_select_joins_paths() {
        let context = EditorContext::default().with_chooser(chooser(&["Res://a.png", "Res://b.png"]));
        let mut select = AssetSelect::from_spec(&WidgetSpec::parse("MultiAssetsSelect,.png"), true);
        assert!(select.apply(Edit::Browse, &context));
        assert_eq!(select.display(), "Res://a.png|Res://b.png");
    }

    #[test]
    fn node_select_scopes_chooser() {
        let scripted = std::rc::Rc::new(chooser(&["Root/Camera"]));
        let mut context = EditorContext::default();
        context.chooser = scripted.clone();
        let mut select = NodeSelect::from_spec(&WidgetSpec::parse("NodeSelect,42"));
        assert!(select.apply(Edit::Browse, &context));
        assert_eq!(select.display(), "Root/Camera");
        assert_eq!(scripted.filters.borrow()[0], (ChooserKind::Node, "42".to_string()));
    }

    #[test]
    fn object_select_checks_class() {
        let context = EditorContext::default().with_objects(Scene);
        let mut select = ObjectSelect::from_spec(&WidgetSpec::parse("Res,Material"));
        assert!(select.apply(Edit::Text("1".into()), &context));
        assert!(!select.apply(Edit::Text("2".into()), &context));
        assert!(!select.apply(Edit::Text("9".into()), &context));
        assert_eq!(select.parse(&context), Some(PropertyValue::Int(1)));
        assert!(select.apply(Edit::Text("-1".into()), &context));
        assert_eq!(select.id(), ObjectSelect::NONE);
    }
}
