use std::fmt;

/// Position of a conversion within the tree, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingContext {
    path: String,
}

impl MappingContext {
    pub fn root() -> Self {
        Self::default()
    }

    /// Context rooted at an existing property path.
    pub fn at(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Context of the mapping child `name`.
    pub fn child(&self, name: &str) -> Self {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        };
        Self { path }
    }

    /// Context of the sequence element at `index`.
    pub fn element(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
        }
    }
}

impl fmt::Display for MappingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.path)
        }
    }
}
