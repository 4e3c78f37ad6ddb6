//! Named, typed parameter sets bound to tree edges.

use crate::record::{Record, Value};

/// Tag of the record element holding a parameter set.
pub const PARAMETERS_TAG: &str = "Parameters";
/// Tag of a single parameter entry inside a parameter set.
pub const PARAMETER_TAG: &str = "Parameter";

/// A single named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorParameter {
    pub name: String,
    pub value: Value,
}

/// An ordered mapping from parameter name to value.
///
/// Names are unique: inserting an existing name replaces its value in place,
/// so declaration order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BehaviorParameterCollection {
    entries: Vec<BehaviorParameter>,
}

impl BehaviorParameterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|p| p.name == name) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value)),
            None => {
                self.entries.push(BehaviorParameter { name, value });
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BehaviorParameter> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads a parameter set from a `Parameters` record.
    ///
    /// Each `Parameter` child contributes its `Name` and `Value` attributes.
    /// Entries missing either attribute, or carrying another tag, are skipped.
    pub fn load(record: &Record) -> Self {
        let mut collection = Self::new();
        for entry in record.children.iter().filter(|c| c.tag == PARAMETER_TAG) {
            if let (Some(name), Some(value)) = (entry.attr_str("Name"), entry.attr("Value")) {
                collection.insert(name, value.clone());
            }
        }
        collection
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for BehaviorParameterCollection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (name, value) in iter {
            collection.insert(name, value);
        }
        collection
    }
}
