//! The generic property tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node of the property tree.
///
/// Mappings keep insertion order. A node is either a leaf (scalar or
/// sequence) or a container (mapping), never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<PropertyValue>),
    Mapping(IndexMap<String, PropertyValue>),
}

impl Default for PropertyValue {
    fn default() -> Self {
        PropertyValue::Mapping(IndexMap::new())
    }
}

impl PropertyValue {
    /// Short name of the node kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::Sequence(_) => "sequence",
            PropertyValue::Mapping(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Floats, and integers widened to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(value) => Some(*value),
            PropertyValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, PropertyValue>> {
        match self {
            PropertyValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, PropertyValue::Mapping(_))
    }

    /// Node at the dot-delimited `path`; the empty path is the node itself.
    pub fn get_path(&self, path: &str) -> Option<&PropertyValue> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |node, segment| node.as_mapping()?.get(segment))
    }

    /// Sets (`Some`) or removes (`None`) the node at `path`.
    ///
    /// Missing parents are created; a leaf standing where a parent mapping is
    /// needed is replaced by one. Removal never creates anything.
    pub fn set_path(&mut self, path: &str, value: Option<PropertyValue>) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };

        match value {
            Some(value) => {
                let mut node = self;
                for segment in parents {
                    let Some(entries) = node.ensure_mapping() else {
                        return;
                    };
                    node = entries.entry(segment.to_string()).or_default();
                }
                if let Some(entries) = node.ensure_mapping() {
                    entries.insert(last.to_string(), value);
                }
            }
            None => {
                let mut node = self;
                for segment in parents {
                    match node {
                        PropertyValue::Mapping(entries) => match entries.get_mut(*segment) {
                            Some(child) => node = child,
                            None => return,
                        },
                        _ => return,
                    }
                }
                if let PropertyValue::Mapping(entries) = node {
                    entries.shift_remove(*last);
                }
            }
        }
    }

    /// All leaf nodes (anything but a mapping) with their full paths, in
    /// tree order.
    pub fn leaves(&self) -> Vec<(String, &PropertyValue)> {
        let mut leaves = Vec::new();
        self.collect_leaves(String::new(), &mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, prefix: String, out: &mut Vec<(String, &'a PropertyValue)>) {
        match self {
            PropertyValue::Mapping(entries) => {
                for (key, child) in entries {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    child.collect_leaves(path, out);
                }
            }
            _ => out.push((prefix, self)),
        }
    }

    /// Entries of this node, replacing a non-mapping node by an empty one.
    fn ensure_mapping(&mut self) -> Option<&mut IndexMap<String, PropertyValue>> {
        if !self.is_mapping() {
            *self = PropertyValue::default();
        }
        match self {
            PropertyValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(value.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        PropertyValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, PropertyValue>> for PropertyValue {
    fn from(entries: IndexMap<String, PropertyValue>) -> Self {
        PropertyValue::Mapping(entries)
    }
}
