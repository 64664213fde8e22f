//! Simple-name imports used to resolve declaration types

use rustc_hash::FxHashMap;
use strata_runtime::{types::simple_class_name, ENUM_CLASS, OBJECT_CLASS, STRING_CLASS};

/// Map from simple class names to binary names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    entries: FxHashMap<String, String>,
}

impl ImportTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the core language classes imported
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for class in [OBJECT_CLASS, STRING_CLASS, ENUM_CLASS] {
            table.import(class);
        }
        table
    }

    /// Import a binary name under its simple name (`a.b.Outer$Inner` as `Inner`)
    pub fn import(&mut self, binary_name: impl Into<String>) -> &mut Self {
        let binary_name = binary_name.into();
        let simple = simple_class_name(&binary_name).to_string();
        self.entries.insert(simple, binary_name);
        self
    }

    /// Import a binary name under an explicit alias
    pub fn import_as(&mut self, alias: impl Into<String>, binary_name: impl Into<String>) -> &mut Self {
        self.entries.insert(alias.into(), binary_name.into());
        self
    }

    /// Binary name imported under `simple`
    pub fn resolve(&self, simple: &str) -> Option<&str> {
        self.entries.get(simple).map(String::as_str)
    }

    /// Number of imports
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is imported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every import of `other` into this table
    pub fn extend(&mut self, other: &ImportTable) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }
}
