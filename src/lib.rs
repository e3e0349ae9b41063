use std::io::Write;

pub mod check;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod editor;
pub mod error;
pub mod group;
pub mod mapping;
pub mod namespace;
pub mod render;
pub mod tree;

pub use config::Config;
pub use editor::{IdentifierPolicy, LeafEditor, LeafForm, Save, Submission};
pub use error::{Error, Result};
pub use mapping::{Field, FieldsConfig, MappingDocument, MappingEntry};
pub use tree::TreeNode;

/// Build the display tree for a [`MappingDocument`].
pub fn build_tree(document: &MappingDocument, config: &Config) -> Result<Vec<TreeNode>> {
    tree::build(
        &document.mapping,
        &document.fields_config,
        &document.namespaces,
        &config.root_id,
        &config.root_name,
    )
}

/// Start an editing session over a document's fields.
pub fn open_editor(document: MappingDocument, config: &Config) -> LeafEditor {
    let policy = IdentifierPolicy::from_document(&document, &config.canonical_id_field);
    LeafEditor::new(document.fields_config, document.use_as_id, policy)
}

/// Write a tree as a text outline.
pub fn render(w: &mut impl Write, nodes: &[TreeNode], fields: &FieldsConfig) -> Result<()> {
    Ok(write!(w, "{}", render::Outline::new(nodes, fields))?)
}
