//! Render a display tree as an indented text outline.
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::mapping::FieldsConfig;
use crate::tree::TreeNode;

/// A text view of a display tree.
///
/// Children are grouped by `parent` and listed in tree order. A node is printed at most once, so
/// self-referencing segment chains such as `a/a` terminate.
pub struct Outline<'a> {
    nodes: &'a [TreeNode],
    fields: &'a FieldsConfig,
}

impl<'a> Outline<'a> {
    pub fn new(nodes: &'a [TreeNode], fields: &'a FieldsConfig) -> Self {
        Self { nodes, fields }
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        children: &HashMap<&str, Vec<usize>>,
        visited: &mut HashSet<usize>,
        index: usize,
        depth: usize,
    ) -> fmt::Result {
        if !visited.insert(index) {
            return Ok(());
        }
        let node = &self.nodes[index];
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        if !node.leaf {
            writeln!(f, "{}/", node.name)?;
        } else if node.fields.is_empty() {
            writeln!(f, "{} (no fields)", node.name)?;
        } else {
            let fields: Vec<String> = node
                .fields
                .iter()
                .filter_map(|&i| self.fields.get(i))
                .map(|field| {
                    let marker = if field.enabled { "" } else { " [disabled]" };
                    format!("{} \"{}\"{marker}", field.name, field.alias)
                })
                .collect();
            writeln!(f, "{} = {}", node.name, fields.join(", "))?;
        }
        if node.may_have_children()
            && let Some(ids) = children.get(node.id.as_str())
        {
            for &child in ids {
                self.write_node(f, children, visited, child, depth + 1)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = &node.parent {
                children.entry(parent.as_str()).or_default().push(i);
            }
        }
        let mut visited = HashSet::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.parent.is_none() {
                self.write_node(f, &children, &mut visited, i, 0)?;
            }
        }
        Ok(())
    }
}
