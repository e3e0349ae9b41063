//! Mapping document types.
use std::ops::{Index, IndexMut};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A reference into [`FieldsConfig`].
///
/// [`UNMAPPED`] marks a property with no field behind it.
pub type FieldRef = i64;

/// Sentinel field reference for "no field defined".
pub const UNMAPPED: FieldRef = -1;

/// Property paths mapped to their entries, in document order.
pub type MappingTable = IndexMap<String, Vec<MappingEntry>>;

/// Short namespace prefixes mapped to full namespace URIs, in document order.
pub type NamespaceTable = IndexMap<String, String>;

/// One way a property path is populated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingEntry {
    pub fields: Vec<FieldRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A backend field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub alias: String,
    pub enabled: bool,
}

/// The backing store of all fields, addressed by index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldsConfig(Vec<Field>);

/// A service's mapping configuration, as fetched for one editing session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDocument {
    pub mapping: MappingTable,
    #[serde(default)]
    pub namespaces: NamespaceTable,
    #[serde(default)]
    pub use_as_id: String,
    #[serde(default)]
    pub missing_gml_id: bool,
    #[serde(default)]
    pub supports_res_id_query: bool,
    #[serde(default)]
    pub fields_config: FieldsConfig,
}

impl MappingEntry {
    pub fn new(fields: Vec<FieldRef>) -> Self {
        Self {
            fields,
            pattern: None,
        }
    }

    /// Return `true` if the entry's first reference is the [`UNMAPPED`] sentinel.
    pub fn is_unmapped(&self) -> bool {
        self.fields.first() == Some(&UNMAPPED)
    }

    /// Return `true` if the entry's fields are shown in the tree.
    pub fn is_displayable(&self) -> bool {
        self.pattern.is_none() && !self.is_unmapped()
    }
}

impl Field {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            enabled: true,
        }
    }
}

impl FieldsConfig {
    pub fn new(fields: Vec<Field>) -> Self {
        Self(fields)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.0.get(index)
    }

    /// Resolve a [`FieldRef`] to an index into this store.
    pub fn resolve(&self, field_ref: FieldRef) -> Option<usize> {
        usize::try_from(field_ref).ok().filter(|&i| i < self.0.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Field> {
        self.0
    }
}

impl Index<usize> for FieldsConfig {
    type Output = Field;

    fn index(&self, index: usize) -> &Field {
        &self.0[index]
    }
}

impl IndexMut<usize> for FieldsConfig {
    fn index_mut(&mut self, index: usize) -> &mut Field {
        &mut self.0[index]
    }
}

impl From<Vec<Field>> for FieldsConfig {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

/// Return `true` if the path is left out of the tree entirely.
///
/// Only the first entry decides; an empty entry list is kept.
pub fn is_excluded(entries: &[MappingEntry]) -> bool {
    entries.first().is_some_and(MappingEntry::is_unmapped)
}
