pub mod adapter;
pub mod asset_select;
pub mod checkbox;
pub mod collaborators;
pub mod color_picker;
pub mod combobox;
pub mod numeric_input;
pub mod text_edit;
pub mod vector_edit;

use std::rc::Rc;

use gridbind_schema::{WidgetSpec, WidgetType};

pub use adapter::{AdapterFactory, Edit, EditorAdapter};
pub use collaborators::{
    Chooser, ChooserKind, EditorContext, ExpressionEvaluator, LiteralEvaluator, ObjectId,
    ObjectRegistry,
};

use asset_select::{AssetSelect, NodeSelect, ObjectSelect};
use checkbox::Checkbox;
use color_picker::ColorPicker;
use combobox::ComboBox;
use numeric_input::NumericInput;
use text_edit::{READ_ONLY_PARAM, TextEdit};
use vector_edit::{VectorEdit, VectorSize};

/// Editors shipped with the grid, keyed by the widget type they serve.
pub fn builtin_adapters() -> Vec<(WidgetType, AdapterFactory)> {
    fn factory(
        f: impl Fn(&WidgetSpec, &str, &EditorContext) -> Box<dyn EditorAdapter> + 'static,
    ) -> AdapterFactory {
        Rc::new(f)
    }

    vec![
        (WidgetType::Int, factory(|_, _, _| Box::new(NumericInput::integer(0)))),
        (WidgetType::Real, factory(|_, _, _| Box::new(NumericInput::new(0.0)))),
        (
            WidgetType::Vector2,
            factory(|_, _, _| Box::new(VectorEdit::new(VectorSize::Vec2))),
        ),
        (
            WidgetType::Vector3,
            factory(|_, _, _| Box::new(VectorEdit::new(VectorSize::Vec3))),
        ),
        (WidgetType::ColorSelect, factory(|_, _, _| Box::new(ColorPicker::default()))),
        (WidgetType::CheckBox, factory(|_, _, _| Box::new(Checkbox::default()))),
        (
            WidgetType::ComboBox,
            factory(|spec, _, _| Box::new(ComboBox::from_spec(spec))),
        ),
        (
            WidgetType::String,
            factory(|spec, property, context| {
                let read_only = spec.has_param(READ_ONLY_PARAM) || context.is_read_only(property);
                Box::new(TextEdit::new(read_only))
            }),
        ),
        (
            WidgetType::AssetsSelect,
            factory(|spec, _, _| Box::new(AssetSelect::from_spec(spec, false))),
        ),
        (
            WidgetType::MultiAssetsSelect,
            factory(|spec, _, _| Box::new(AssetSelect::from_spec(spec, true))),
        ),
        (
            WidgetType::NodeSelect,
            factory(|spec, _, _| Box::new(NodeSelect::from_spec(spec))),
        ),
        (WidgetType::Res, factory(|spec, _, _| Box::new(ObjectSelect::from_spec(spec)))),
        (WidgetType::Default, factory(|_, _, _| Box::new(TextEdit::native()))),
    ]
}
