use std::collections::HashMap;
use std::rc::Rc;

use bevy::prelude::*;
use gridbind_schema::{PropertyValue, WidgetSpec, WidgetType};
use gridbind_widgets::{AdapterFactory, Edit, EditorAdapter, EditorContext, builtin_adapters};

use crate::model::SchemaModel;
use crate::settings::GridSettings;

/// Drawing surface handed to custom paint functions.
pub trait CellPainter {
    fn fill_rect(&mut self, region: Rect, color: Color);
    fn draw_text(&mut self, region: Rect, text: &str);
    fn draw_image(&mut self, region: Rect, path: &str);
}

pub type PaintFn = Rc<dyn Fn(&WidgetSpec, &PropertyValue, Rect, &mut dyn CellPainter)>;

#[derive(Default)]
struct WidgetEntry {
    factory: Option<AdapterFactory>,
    paint: Option<PaintFn>,
    custom_paint: bool,
}

/// Maps widget types to their editor factory and paint function.
pub struct WidgetDispatchRegistry {
    entries: HashMap<WidgetType, WidgetEntry>,
    settings: GridSettings,
}

impl Default for WidgetDispatchRegistry {
    fn default() -> Self {
        Self::with_builtins(GridSettings::default())
    }
}

impl WidgetDispatchRegistry {
    /// A registry that knows no widget types.
    pub fn empty(settings: GridSettings) -> Self {
        Self {
            entries: HashMap::new(),
            settings,
        }
    }

    pub fn with_builtins(settings: GridSettings) -> Self {
        let mut registry = Self::empty(settings);
        for (widget_type, factory) in builtin_adapters() {
            registry.entries.entry(widget_type).or_default().factory = Some(factory);
        }
        registry.register(WidgetType::ColorSelect.tag(), true, Some(Rc::new(paint_color_swatch)));
        registry.register(WidgetType::CheckBox.tag(), true, Some(Rc::new(paint_checkbox)));
        let preview = asset_preview(registry.settings.clone());
        registry.register(WidgetType::AssetsSelect.tag(), true, Some(preview));
        registry
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Declare a widget type and how its cells are drawn. Re-registering a tag
    /// keeps its editor factory.
    pub fn register(&mut self, tag: &str, supports_custom_paint: bool, paint: Option<PaintFn>) {
        let Some(widget_type) = WidgetType::from_tag(tag) else {
            warn!("Ignoring widget registration with an empty tag");
            return;
        };
        let entry = self.entries.entry(widget_type).or_default();
        entry.custom_paint = supports_custom_paint;
        if paint.is_some() {
            entry.paint = paint;
        }
    }

    pub fn register_editor(&mut self, tag: &str, factory: AdapterFactory) {
        let Some(widget_type) = WidgetType::from_tag(tag) else {
            warn!("Ignoring editor registration with an empty tag");
            return;
        };
        self.entries.entry(widget_type).or_default().factory = Some(factory);
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        WidgetType::from_tag(tag).is_some_and(|t| self.entries.contains_key(&t))
    }

    pub fn create_editor(
        &self,
        spec: &WidgetSpec,
        property: &str,
        context: &EditorContext,
    ) -> Option<CellEditor> {
        let widget_type = spec.widget_type()?;
        let Some(factory) = self.entries.get(&widget_type).and_then(|e| e.factory.as_ref()) else {
            debug!("No editor registered for widget '{}'", spec.tag);
            return None;
        };
        Some(CellEditor {
            property: property.to_string(),
            native: widget_type == WidgetType::Default,
            adapter: factory(spec, property, context),
        })
    }

    /// Open an editor on the cell bound to `property`, loaded with its value.
    /// Disabled cells and cells without an editor yield `None`.
    pub fn begin_edit(
        &self,
        model: &SchemaModel,
        property: &str,
        context: &EditorContext,
    ) -> Option<CellEditor> {
        let node = model.node(model.node_for_property(property)?)?;
        if !node.enabled {
            debug!("Cell '{property}' is disabled by its constraint");
            return None;
        }
        let mut editor = self.create_editor(&node.widget, property, context)?;
        if let Some(value) = model.find_value(property) {
            editor.adapter.load(value);
        }
        Some(editor)
    }

    /// Returns `false` when the view should fall back to its default drawing.
    pub fn paint(
        &self,
        spec: &WidgetSpec,
        value: &PropertyValue,
        region: Rect,
        painter: &mut dyn CellPainter,
    ) -> bool {
        let Some(entry) = spec.widget_type().and_then(|t| self.entries.get(&t)) else {
            return false;
        };
        match &entry.paint {
            Some(paint) if entry.custom_paint => {
                paint(spec, value, region, painter);
                true
            }
            _ => false,
        }
    }

    /// Preferred cell size. Width is left to the view. Only asset selectors
    /// filtering for images get the tall preview row.
    pub fn size_hint(&self, spec: &WidgetSpec, value: &PropertyValue) -> Vec2 {
        let asset = matches!(
            spec.widget_type(),
            Some(WidgetType::AssetsSelect | WidgetType::MultiAssetsSelect)
        );
        let previews_image = asset
            && spec.params.iter().any(|p| self.settings.is_image_path(p))
            && !value.to_string().is_empty();
        let height = if previews_image {
            self.settings.image_row_height
        } else {
            self.settings.row_height
        };
        Vec2::new(0.0, height)
    }
}

fn paint_color_swatch(_: &WidgetSpec, value: &PropertyValue, region: Rect, painter: &mut dyn CellPainter) {
    let PropertyValue::Color(color) = value else {
        painter.draw_text(region, &value.to_string());
        return;
    };
    let swatch = Rect::from_corners(region.min, region.min + Vec2::splat(region.height()));
    painter.fill_rect(swatch, *color);
    let label = Rect::from_corners(Vec2::new(swatch.max.x + 4.0, region.min.y), region.max);
    painter.draw_text(label, &value.to_string());
}

fn paint_checkbox(_: &WidgetSpec, value: &PropertyValue, region: Rect, painter: &mut dyn CellPainter) {
    let side = region.height().min(region.width());
    let bx = Rect::from_center_size(region.center(), Vec2::splat(side * 0.7));
    painter.fill_rect(bx, Color::srgb(0.2, 0.2, 0.2));
    if matches!(value, PropertyValue::Bool(true)) {
        painter.fill_rect(bx.inflate(-side * 0.15), Color::WHITE);
    }
}

fn asset_preview(settings: GridSettings) -> PaintFn {
    Rc::new(
        move |spec: &WidgetSpec, value: &PropertyValue, region: Rect, painter: &mut dyn CellPainter| {
            let path = value.to_string();
            let image = settings.is_image_path(&path)
                || spec.params.iter().any(|p| settings.is_image_path(p));
            if image && !path.is_empty() {
                painter.draw_image(region, &path);
            } else {
                painter.draw_text(region, &path);
            }
        },
    )
}

/// An open editor for one bound cell.
pub struct CellEditor {
    property: String,
    native: bool,
    adapter: Box<dyn EditorAdapter>,
}

impl CellEditor {
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Set for the view's own free-text editor.
    pub fn is_native(&self) -> bool {
        self.native
    }

    pub fn widget_type(&self) -> WidgetType {
        self.adapter.widget_type()
    }

    pub fn is_read_only(&self) -> bool {
        self.adapter.is_read_only()
    }

    pub fn apply(&mut self, edit: Edit, context: &EditorContext) -> bool {
        self.adapter.apply(edit, context)
    }

    pub fn display(&self) -> String {
        self.adapter.display()
    }

    /// Parse the pending edit and store it. A native editor keeps the kind of
    /// the value it replaces.
    pub fn commit(&self, model: &mut SchemaModel, context: &EditorContext) -> bool {
        if self.adapter.is_read_only() {
            return false;
        }
        let parsed = self.adapter.parse(context).and_then(|value| {
            match (self.native, model.find_value(&self.property)) {
                (true, Some(current)) => PropertyValue::parse_as(current.kind(), &value.to_string()),
                _ => Some(value),
            }
        });
        match parsed {
            Some(value) => model.set_value(&self.property, value),
            None => {
                debug!("Discarding edit of '{}'", self.property);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbind_schema::SchemaBuilder;

    #[derive(Default)]
    struct Recorder {
        fills: Vec<Color>,
        texts: Vec<String>,
        images: Vec<String>,
    }

    impl CellPainter for Recorder {
        fn fill_rect(&mut self, _region: Rect, color: Color) {
            self.fills.push(color);
        }

        fn draw_text(&mut self, _region: Rect, text: &str) {
            self.texts.push(text.to_string());
        }

        fn draw_image(&mut self, _region: Rect, path: &str) {
            self.images.push(path.to_string());
        }
    }

    fn region() -> Rect {
        Rect::new(0.0, 0.0, 120.0, 20.0)
    }

    fn model(build: impl FnOnce(&mut SchemaBuilder)) -> SchemaModel {
        let mut builder = SchemaBuilder::new();
        build(&mut builder);
        let mut model = SchemaModel::parse(&builder.result()).unwrap();
        for (name, value) in builder.initial_values() {
            model.set_value(name, value.clone());
        }
        model
    }

    #[test]
    fn unknown_or_empty_tag_has_no_editor() {
        let registry = WidgetDispatchRegistry::default();
        let context = EditorContext::default();
        assert!(registry.create_editor(&WidgetSpec::parse("Gizmo"), "p", &context).is_none());
        assert!(registry.create_editor(&WidgetSpec::default(), "p", &context).is_none());
        let mut painter = Recorder::default();
        assert!(!registry.paint(&WidgetSpec::parse("Gizmo"), &PropertyValue::Int(1), region(), &mut painter));
    }

    #[test]
    fn default_tag_gives_native_editor() {
        let registry = WidgetDispatchRegistry::default();
        let editor = registry
            .create_editor(&WidgetSpec::parse("default"), "p", &EditorContext::default())
            .unwrap();
        assert!(editor.is_native());
        assert_eq!(editor.widget_type(), WidgetType::Default);
    }

    #[test]
    fn paint_requires_custom_paint_flag() {
        let mut registry = WidgetDispatchRegistry::default();
        let mut painter = Recorder::default();
        let color = PropertyValue::Color(Color::srgb(1.0, 0.0, 0.0));
        assert!(registry.paint(&WidgetSpec::parse("ColorSelect"), &color, region(), &mut painter));
        assert_eq!(painter.fills, [Color::srgb(1.0, 0.0, 0.0)]);
        assert_eq!(painter.texts, ["#FF0000"]);

        assert!(!registry.paint(&WidgetSpec::parse("Int"), &PropertyValue::Int(3), region(), &mut painter));

        registry.register("ColorSelect", false, None);
        assert!(!registry.paint(&WidgetSpec::parse("ColorSelect"), &color, region(), &mut painter));
    }

    #[test]
    fn image_assets_get_tall_rows() {
        let registry = WidgetDispatchRegistry::default();
        let image = WidgetSpec::parse("AssetsSelect,.png|.jpg");
        let audio = WidgetSpec::parse("AssetsSelect,.wav");
        let path = PropertyValue::from("Res://hero.png");
        assert_eq!(registry.size_hint(&image, &path).y, 64.0);
        assert_eq!(registry.size_hint(&image, &PropertyValue::from("")).y, 20.0);
        assert_eq!(registry.size_hint(&audio, &path).y, 20.0);
        let near_miss = WidgetSpec::parse("AssetsSelect,.tgax");
        assert_eq!(registry.size_hint(&near_miss, &path).y, 20.0);

        let mut painter = Recorder::default();
        assert!(registry.paint(&image, &path, region(), &mut painter));
        assert_eq!(painter.images, ["Res://hero.png"]);
    }

    #[test]
    fn image_named_options_keep_normal_rows() {
        let registry = WidgetDispatchRegistry::default();
        let combo = WidgetSpec::parse("ComboBox,icon.png,logo.jpg");
        let text = WidgetSpec::parse("String,.png");
        assert_eq!(registry.size_hint(&combo, &PropertyValue::from("icon.png")).y, 20.0);
        assert_eq!(registry.size_hint(&text, &PropertyValue::from("a.png")).y, 20.0);
    }

    #[test]
    fn begin_edit_loads_and_commits() {
        let registry = WidgetDispatchRegistry::default();
        let context = EditorContext::default();
        let mut model = model(|b| {
            b.add_item("speed", 1.5, WidgetType::Real);
        });

        let mut editor = registry.begin_edit(&model, "speed", &context).unwrap();
        assert_eq!(editor.display(), "1.5");
        assert!(editor.apply(Edit::Text("4".into()), &context));
        assert!(editor.commit(&mut model, &context));
        assert_eq!(model.find_value("speed"), Some(&PropertyValue::Float(4.0)));

        editor.apply(Edit::Text("fast".into()), &context);
        assert!(!editor.commit(&mut model, &context));
        assert_eq!(model.find_value("speed"), Some(&PropertyValue::Float(4.0)));
    }

    #[test]
    fn native_editor_keeps_value_kind() {
        let registry = WidgetDispatchRegistry::default();
        let context = EditorContext::default();
        let mut model = model(|b| {
            b.add_item("count", 2, WidgetType::Default);
        });
        let mut editor = registry.begin_edit(&model, "count", &context).unwrap();
        editor.apply(Edit::Text(" 7 ".into()), &context);
        assert!(editor.commit(&mut model, &context));
        assert_eq!(model.find_value("count"), Some(&PropertyValue::Int(7)));
    }

    #[test]
    fn host_registered_editor_is_used() {
        let mut registry = WidgetDispatchRegistry::default();
        assert!(!registry.is_registered("Slider"));
        registry.register_editor(
            "Slider",
            Rc::new(|_: &WidgetSpec, _: &str, _: &EditorContext| -> Box<dyn EditorAdapter> {
                Box::new(gridbind_widgets::numeric_input::NumericInput::new(0.0))
            }),
        );
        assert!(registry.is_registered("Slider"));
        let editor = registry.create_editor(&WidgetSpec::parse("Slider,0,1"), "v", &EditorContext::default());
        assert_eq!(editor.map(|e| e.widget_type()), Some(WidgetType::Real));
    }

    #[test]
    fn disabled_cell_cannot_be_edited() {
        let registry = WidgetDispatchRegistry::default();
        let model = model(|b| {
            b.add_item("mode", "A", WidgetType::String).constrain("kind", &["special"]);
        });
        assert!(registry.begin_edit(&model, "mode", &EditorContext::default()).is_none());
    }
}
