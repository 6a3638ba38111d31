use std::collections::BTreeMap;
use std::fmt;

use bevy::color::Srgba;
use bevy::prelude::*;

/// Typed initial values keyed by property name, as recorded by the builder.
pub type ValueMap = BTreeMap<String, PropertyValue>;

// ---------------------------------------------------------------------------
// ValueKind
// ---------------------------------------------------------------------------

/// Discriminant of [`PropertyValue`], used when parsing display text back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Vec2,
    Vec3,
    Color,
}

// ---------------------------------------------------------------------------
// PropertyValue enum
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Color(Color),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Vec2(_) => ValueKind::Vec2,
            Self::Vec3(_) => ValueKind::Vec3,
            Self::Color(_) => ValueKind::Color,
        }
    }

    /// Parse display text produced by the `Display` impl back into a value of `kind`.
    /// Strings are taken verbatim, every other kind ignores surrounding whitespace.
    pub fn parse_as(kind: ValueKind, raw: &str) -> Option<Self> {
        let text = raw.trim();
        match kind {
            ValueKind::Bool => match text {
                "true" | "1" => Some(Self::Bool(true)),
                "false" | "0" => Some(Self::Bool(false)),
                _ => None,
            },
            ValueKind::Int => text.parse().ok().map(Self::Int),
            ValueKind::Float => text.parse().ok().map(Self::Float),
            ValueKind::String => Some(Self::String(raw.to_string())),
            ValueKind::Vec2 => {
                let [x, y] = parse_components::<2>(text)?;
                Some(Self::Vec2(Vec2::new(x, y)))
            }
            ValueKind::Vec3 => {
                let [x, y, z] = parse_components::<3>(text)?;
                Some(Self::Vec3(Vec3::new(x, y, z)))
            }
            ValueKind::Color => Srgba::hex(text).ok().map(|c| Self::Color(c.into())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

fn parse_components<const N: usize>(text: &str) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    let mut parts = text.split(',');
    for slot in out.iter_mut() {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Vec2(v) => write!(f, "{},{}", v.x, v.y),
            Self::Vec3(v) => write!(f, "{},{},{}", v.x, v.y, v.z),
            Self::Color(c) => f.write_str(&c.to_srgba().to_hex()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec2> for PropertyValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for PropertyValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Color> for PropertyValue {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}
