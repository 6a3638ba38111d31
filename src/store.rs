use std::collections::BTreeMap;

use gridbind_schema::PropertyValue;

/// Named values backing a grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyValueStore {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyValueStore {
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Store `value` under `name`. Returns `false`, leaving the store untouched,
    /// when the stored value is already equal.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> bool {
        match self.values.get_mut(name) {
            Some(current) if *current == value => false,
            Some(current) => {
                *current = value;
                true
            }
            None => {
                self.values.insert(name.to_string(), value);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
