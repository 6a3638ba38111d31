use anyhow::Result;
use bevy::prelude::*;
use gridbind_schema::{PropertyValue, SchemaBuilder, WidgetType};
use gridbind_widgets::ObjectId;

use crate::model::PropertyChanged;

/// How a reflected property is stored, which decides its editor.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyKind {
    Bool,
    Int,
    Real,
    String,
    Vector2,
    Vector3,
    Color,
    /// `extensions` is a `|` separated filter such as `.png|.jpg`.
    ResourcePath { extensions: String },
    /// Options are joined with `,` in the widget spec, so an option
    /// containing a comma is left out.
    StringOption { options: Vec<String> },
    NodePath,
    /// Reference to another object, restricted to the classes in `class_hint`.
    Object { class_hint: String },
    Other,
}

impl PropertyKind {
    fn placeholder(&self) -> PropertyValue {
        match self {
            Self::Bool => PropertyValue::Bool(false),
            Self::Int => PropertyValue::Int(0),
            Self::Real => PropertyValue::Float(0.0),
            Self::Vector2 => PropertyValue::Vec2(Vec2::ZERO),
            Self::Vector3 => PropertyValue::Vec3(Vec3::ZERO),
            Self::Color => PropertyValue::Color(Color::WHITE),
            Self::Object { .. } => PropertyValue::Int(-1),
            _ => PropertyValue::String(String::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyInfo {
    pub name: String,
    pub kind: PropertyKind,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Reflection surface of the engine objects a grid can edit.
pub trait PropertyHost {
    /// Classes of `object` from the most basic to the most derived. The
    /// universal root class is left out.
    fn class_chain(&self, object: ObjectId) -> Vec<String>;

    /// Properties declared by `class` itself.
    fn properties(&self, class: &str) -> Vec<PropertyInfo>;

    fn current_value(&self, object: ObjectId, property: &str) -> Option<PropertyValue>;

    fn set_value(&mut self, object: ObjectId, property: &str, value: &PropertyValue) -> Result<()>;
}

/// Describe every property of `object` in `builder`, one group per class.
pub fn inspect_object(builder: &mut SchemaBuilder, host: &dyn PropertyHost, object: ObjectId) {
    for class in host.class_chain(object) {
        let properties = host.properties(&class);
        if properties.is_empty() {
            continue;
        }
        builder.begin_group(&class);
        for info in &properties {
            let value = host.current_value(object, &info.name).unwrap_or_else(|| {
                warn!("{object:?} has no value for '{}'", info.name);
                info.kind.placeholder()
            });
            add_property(builder, object, info, value);
        }
        builder.end_group();
    }
}

fn add_property(builder: &mut SchemaBuilder, object: ObjectId, info: &PropertyInfo, value: PropertyValue) {
    let (widget, params) = match &info.kind {
        PropertyKind::Bool => (WidgetType::CheckBox, String::new()),
        PropertyKind::Int => (WidgetType::Int, String::new()),
        PropertyKind::Real => (WidgetType::Real, String::new()),
        PropertyKind::String => (WidgetType::String, String::new()),
        PropertyKind::Vector2 => (WidgetType::Vector2, String::new()),
        PropertyKind::Vector3 => (WidgetType::Vector3, String::new()),
        PropertyKind::Color => (WidgetType::ColorSelect, String::new()),
        PropertyKind::ResourcePath { extensions } => (WidgetType::AssetsSelect, extensions.clone()),
        PropertyKind::StringOption { options } => (WidgetType::ComboBox, combo_params(&info.name, options)),
        PropertyKind::NodePath => (WidgetType::NodeSelect, object.0.to_string()),
        PropertyKind::Object { class_hint } => (WidgetType::Res, class_hint.clone()),
        PropertyKind::Other => {
            builder.add_display_item(&info.name, value);
            return;
        }
    };
    builder.add_item(&info.name, value, widget).params(&params);
}

fn combo_params(property: &str, options: &[String]) -> String {
    options
        .iter()
        .filter(|option| {
            let ok = !option.contains(',');
            if !ok {
                warn!("Option '{option}' of '{property}' contains ',' and is left out");
            }
            ok
        })
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Push an edited grid value back into the object. Rejections are logged.
pub fn write_back(host: &mut dyn PropertyHost, object: ObjectId, change: &PropertyChanged) -> bool {
    match host.set_value(object, &change.property, &change.value) {
        Ok(()) => true,
        Err(err) => {
            error!(
                "Can't set property '{}' to '{}': {err:#}",
                change.property, change.value
            );
            false
        }
    }
}
