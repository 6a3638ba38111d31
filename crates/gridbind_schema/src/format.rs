use std::collections::BTreeMap;

use bevy::log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Top-level schema document: column headers plus the item tree.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SchemaDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<SchemaItem>,
}

impl SchemaDocument {
    pub fn from_text(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_text(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string(self)?)
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One cell of the grid. Items without a property are plain labels.
///
/// Every attribute is optional on the wire. Missing or mistyped ones fall
/// back to neutral defaults so a partially written document still loads.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SchemaItem {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub row: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub col: u32,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub tooltip: String,
    /// Comma joined widget spec token, see [`crate::WidgetSpec`].
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub widget: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub property: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaItem>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Any JSON is accepted; a value of the wrong shape becomes `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_else(|err| {
        warn!("Ignoring malformed schema attribute: {err}");
        T::default()
    }))
}

/// Item lists drop entries that are not objects instead of failing as a whole.
fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<SchemaItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(raw) = Value::deserialize(deserializer)? else {
        warn!("Ignoring schema item list that is not an array");
        return Ok(Vec::new());
    };
    Ok(raw
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("Skipping malformed schema item: {err}");
                None
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Constraint
// ---------------------------------------------------------------------------

/// Referenced property name -> comma separated list of allowed values.
///
/// Allowed values are stored joined with `,` and have no escaping, so a value
/// may not itself contain a comma.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Constraint(pub BTreeMap<String, String>);

impl Constraint {
    pub fn new(property: impl Into<String>, allowed: &[&str]) -> Self {
        let mut constraint = Self::default();
        constraint.insert(property, allowed);
        constraint
    }

    /// Values containing `,` can't be represented and are dropped with a warning.
    pub fn insert(&mut self, property: impl Into<String>, allowed: &[&str]) {
        let property = property.into();
        let kept: Vec<&str> = allowed
            .iter()
            .copied()
            .filter(|value| {
                let ok = !value.contains(',');
                if !ok {
                    warn!("Constraint on '{property}' can't allow '{value}': values may not contain ','");
                }
                ok
            })
            .collect();
        self.0.insert(property, kept.join(","));
    }

    /// Property names this constraint depends on.
    pub fn referenced(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn allows(&self, property: &str, value: &str) -> bool {
        self.0
            .get(property)
            .is_some_and(|allowed| allowed.split(',').any(|a| a.trim() == value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
