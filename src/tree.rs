//! Build a display tree from a mapping table.
use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::mapping::{self, FieldsConfig, MappingEntry, MappingTable, NamespaceTable};
use crate::namespace::Normalizer;

/// A node in the display tree.
///
/// `fields` holds indices into the [`FieldsConfig`] the tree was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub parent: Option<String>,
    pub leaf: bool,
    pub fields: Vec<usize>,
}

impl TreeNode {
    fn branch(id: &str, name: &str, parent: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            parent: parent.map(str::to_string),
            leaf: false,
            fields: Vec::new(),
        }
    }

    pub fn may_have_children(&self) -> bool {
        !self.leaf
    }
}

/// Build the display tree for `table`.
///
/// Every path contributes its whole segment chain below the root; shared ancestors are collapsed
/// afterwards, keeping the first node seen for each `(id, name, parent)`.
pub fn build(
    table: &MappingTable,
    fields_config: &FieldsConfig,
    namespaces: &NamespaceTable,
    root_id: &str,
    root_name: &str,
) -> Result<Vec<TreeNode>> {
    let normalizer = Normalizer::new(namespaces);
    let mut nodes = vec![TreeNode::branch(root_id, root_name, None)];
    for (path, entries) in table {
        if mapping::is_excluded(entries) {
            tracing::debug!(path = %path, "skipping unmapped path");
            continue;
        }
        let normalized = normalizer.normalize(path);
        let fields = displayable_fields(path, entries, fields_config)?;
        push_chain(&mut nodes, root_id, &normalized, fields);
    }
    Ok(dedup(nodes))
}

/// Resolve the fields a path shows, in entry order.
pub(crate) fn displayable_fields(
    path: &str,
    entries: &[MappingEntry],
    fields_config: &FieldsConfig,
) -> Result<Vec<usize>> {
    let mut fields = Vec::new();
    for entry in entries.iter().filter(|e| e.is_displayable()) {
        for &field_ref in &entry.fields {
            let index = fields_config
                .resolve(field_ref)
                .ok_or_else(|| Error::FieldResolution {
                    path: path.to_string(),
                    index: field_ref,
                })?;
            fields.push(index);
        }
    }
    Ok(fields)
}

fn push_chain(nodes: &mut Vec<TreeNode>, root_id: &str, path: &str, fields: Vec<usize>) {
    let segments: Vec<&str> = path.split('/').collect();
    let mut parent = root_id;
    for (i, &segment) in segments.iter().enumerate() {
        let mut node = TreeNode::branch(segment, segment, Some(parent));
        if i == segments.len() - 1 {
            node.leaf = true;
            node.fields = fields.clone();
        }
        tracing::trace!(id = %segment, parent = %parent, leaf = node.leaf, "node");
        nodes.push(node);
        parent = segment;
    }
}

fn dedup(nodes: Vec<TreeNode>) -> Vec<TreeNode> {
    let mut seen = HashSet::new();
    nodes
        .into_iter()
        .filter(|node| seen.insert((node.id.clone(), node.name.clone(), node.parent.clone())))
        .collect()
}

/// Return the children of `parent`, in tree order.
pub fn children<'a>(
    nodes: &'a [TreeNode],
    parent: &'a str,
) -> impl Iterator<Item = &'a TreeNode> {
    nodes
        .iter()
        .filter(move |n| n.parent.as_deref() == Some(parent))
}

/// Find the leaf for a normalized property path.
///
/// Ancestors match by id and parent only, so a leaf kept under an earlier leaf is still found.
pub fn find_leaf<'a>(nodes: &'a [TreeNode], root_id: &str, path: &str) -> Option<&'a TreeNode> {
    let segments: Vec<&str> = path.split('/').collect();
    let (last, ancestors) = segments.split_last()?;
    let mut parent = root_id;
    for &segment in ancestors {
        nodes
            .iter()
            .find(|n| n.id == segment && n.parent.as_deref() == Some(parent))?;
        parent = segment;
    }
    nodes
        .iter()
        .find(|n| n.leaf && n.id == *last && n.parent.as_deref() == Some(parent))
}
