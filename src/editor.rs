//! Edit the fields behind a selected tree leaf.
use serde::Serialize;

use crate::error::{Error, Result};
use crate::group::FieldGroup;
use crate::mapping::{FieldsConfig, MappingDocument};
use crate::tree::TreeNode;

/// When a leaf may be picked as the feature identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentifierPolicy {
    /// The service lacks its own identifier field.
    pub missing_gml_id: bool,
    /// The service can query features by identifier.
    pub supports_res_id_query: bool,
    /// Field name reserved for the service's own identifier.
    pub canonical_id_field: String,
}

impl IdentifierPolicy {
    pub fn from_document(document: &MappingDocument, canonical_id_field: &str) -> Self {
        Self {
            missing_gml_id: document.missing_gml_id,
            supports_res_id_query: document.supports_res_id_query,
            canonical_id_field: canonical_id_field.to_string(),
        }
    }

    /// Return `true` if a field called `name` may be toggled as the identifier.
    pub fn offers(&self, name: &str) -> bool {
        (self.missing_gml_id || !self.supports_res_id_query) && name != self.canonical_id_field
    }
}

/// The values shown in the leaf editor's form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafForm {
    pub enabled: bool,
    pub name: String,
    pub alias: String,
    /// `None` if the identifier toggle is hidden.
    pub use_as_id: Option<bool>,
}

/// The edited state handed over on save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission<'a> {
    pub fields_config: &'a FieldsConfig,
    pub use_as_id: &'a str,
}

impl Submission<'_> {
    /// Write the edited state into the configuration document it came from.
    pub fn merge_into(&self, document: &mut serde_json::Value) -> Result<()> {
        let serde_json::Value::Object(map) = document else {
            return Err(Error::InvalidDocument(
                "configuration document must be a JSON object".into(),
            ));
        };
        map.insert(
            "fieldsConfig".into(),
            serde_json::to_value(self.fields_config)?,
        );
        map.insert("useAsId".into(), self.use_as_id.into());
        Ok(())
    }
}

/// Persists the edited mapping.
pub trait Save {
    fn save(&mut self, submission: &Submission<'_>) -> Result<()>;
}

impl<F> Save for F
where
    F: FnMut(&Submission<'_>) -> Result<()>,
{
    fn save(&mut self, submission: &Submission<'_>) -> Result<()> {
        self(submission)
    }
}

#[derive(Debug)]
struct Selection {
    leaf: String,
    group: FieldGroup,
    form: LeafForm,
}

/// Editing session for one mapping.
///
/// The editor owns the [`FieldsConfig`] for the whole session; tree leaves address it by index.
/// There is a single identifier slot, so at most one field is ever the identifier.
#[derive(Debug)]
pub struct LeafEditor {
    fields: FieldsConfig,
    use_as_id: String,
    policy: IdentifierPolicy,
    selection: Option<Selection>,
}

impl LeafEditor {
    pub fn new(
        fields: FieldsConfig,
        use_as_id: impl Into<String>,
        policy: IdentifierPolicy,
    ) -> Self {
        Self {
            fields,
            use_as_id: use_as_id.into(),
            policy,
            selection: None,
        }
    }

    pub fn fields(&self) -> &FieldsConfig {
        &self.fields
    }

    pub fn use_as_id(&self) -> &str {
        &self.use_as_id
    }

    /// The form of the selected leaf, if any.
    pub fn form(&self) -> Option<&LeafForm> {
        self.selection.as_ref().map(|s| &s.form)
    }

    pub fn selected_leaf(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.leaf.as_str())
    }

    /// Open the editor on `node`, closing any previous selection.
    pub fn select_leaf(&mut self, node: &TreeNode) -> Result<&LeafForm> {
        if let Some(previous) = self.selection.take() {
            tracing::debug!(leaf = %previous.leaf, "closing leaf editor");
        }
        if !node.leaf {
            return Err(Error::NotALeaf(node.id.clone()));
        }
        if let Some(&index) = node.fields.iter().find(|&&i| self.fields.get(i).is_none()) {
            return Err(Error::FieldResolution {
                path: node.id.clone(),
                index: i64::try_from(index).unwrap_or(i64::MAX),
            });
        }
        let group = FieldGroup::classify(&node.fields);
        let Some(first) = group.first().map(|i| &self.fields[i]) else {
            return Err(Error::EmptyLeaf(node.id.clone()));
        };
        let form = LeafForm {
            enabled: first.enabled,
            name: group.display_name(&self.fields).to_string(),
            alias: group.display_alias(&self.fields).to_string(),
            use_as_id: match group {
                FieldGroup::Singleton(_) if self.policy.offers(&first.name) => {
                    Some(first.name == self.use_as_id)
                }
                _ => None,
            },
        };
        tracing::debug!(
            leaf = %node.id,
            fields = group.indices().len(),
            multilingual = group.is_multilingual(),
            "opening leaf editor"
        );
        let selection = self.selection.insert(Selection {
            leaf: node.id.clone(),
            group,
            form,
        });
        Ok(&selection.form)
    }

    /// Close the editor without saving. Edits already made stay applied.
    pub fn close(&mut self) {
        self.selection = None;
    }

    pub fn on_enabled_change(&mut self, checked: bool) -> Result<()> {
        let selection = self.selection.as_mut().ok_or(Error::NoSelection)?;
        selection.group.set_enabled(&mut self.fields, checked);
        selection.form.enabled = checked;
        Ok(())
    }

    pub fn on_name_change(&mut self, value: &str) -> Result<()> {
        let selection = self.selection.as_mut().ok_or(Error::NoSelection)?;
        selection.group.set_name(&mut self.fields, value);
        selection.form.name = value.to_string();
        Ok(())
    }

    pub fn on_alias_change(&mut self, value: &str) -> Result<()> {
        let selection = self.selection.as_mut().ok_or(Error::NoSelection)?;
        selection.group.set_alias(&mut self.fields, value);
        selection.form.alias = value.to_string();
        Ok(())
    }

    /// Make the selected leaf's first field the identifier, or clear the identifier.
    pub fn on_use_as_id_change(&mut self, checked: bool) -> Result<()> {
        let selection = self.selection.as_mut().ok_or(Error::NoSelection)?;
        if selection.form.use_as_id.is_none() {
            return Err(Error::IdentifierNotOffered(selection.leaf.clone()));
        }
        let first = selection
            .group
            .first()
            .ok_or_else(|| Error::EmptyLeaf(selection.leaf.clone()))?;
        self.use_as_id = if checked {
            self.fields[first].name.clone()
        } else {
            String::new()
        };
        selection.form.use_as_id = Some(checked);
        Ok(())
    }

    pub fn submission(&self) -> Submission<'_> {
        Submission {
            fields_config: &self.fields,
            use_as_id: &self.use_as_id,
        }
    }

    /// Hand the edited state to `target`, then close the editor.
    ///
    /// The editor closes whether or not the save succeeds; edits are never rolled back.
    pub fn save(&mut self, target: &mut impl Save) -> Result<()> {
        tracing::info!(
            use_as_id = %self.use_as_id,
            fields = self.fields.len(),
            "saving mapping"
        );
        let result = target.save(&self.submission());
        if let Err(err) = &result {
            tracing::warn!(error = %err, "saving mapping failed");
        }
        self.close();
        result
    }

    /// End the session, returning the edited fields and identifier.
    pub fn into_parts(self) -> (FieldsConfig, String) {
        (self.fields, self.use_as_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Field;

    fn leaf(id: &str, fields: &[usize]) -> TreeNode {
        TreeNode {
            id: id.into(),
            name: id.into(),
            parent: Some("root".into()),
            leaf: true,
            fields: fields.to_vec(),
        }
    }

    fn store(names: &[(&str, &str)]) -> FieldsConfig {
        names
            .iter()
            .map(|(name, alias)| Field::new(*name, *alias))
            .collect::<Vec<_>>()
            .into()
    }

    fn policy(missing_gml_id: bool, supports_res_id_query: bool) -> IdentifierPolicy {
        IdentifierPolicy {
            missing_gml_id,
            supports_res_id_query,
            canonical_id_field: "id".into(),
        }
    }

    fn editor(names: &[(&str, &str)]) -> LeafEditor {
        LeafEditor::new(store(names), "", policy(true, true))
    }

    macro_rules! test_offers {
        ($name:ident, $missing:expr, $supports:expr, $field:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!(policy($missing, $supports).offers($field), $expected);
            }
        };
    }

    test_offers!(offers_missing_gml_id, true, true, "code", true);
    test_offers!(offers_no_res_id_query, false, false, "code", true);
    test_offers!(offers_not_when_supported, false, true, "code", false);
    test_offers!(offers_not_canonical, true, false, "id", false);

    #[test]
    fn test_select_singleton() {
        let mut editor = LeafEditor::new(
            store(&[("code", "Code"), ("other", "Other")]),
            "code",
            policy(true, true),
        );
        let form = editor.select_leaf(&leaf("code", &[0])).unwrap();
        insta::assert_json_snapshot!(form, @r#"
        {
          "enabled": true,
          "name": "code",
          "alias": "Code",
          "useAsId": true
        }
        "#);
        let form = editor.select_leaf(&leaf("other", &[1])).unwrap();
        assert_eq!(form.use_as_id, Some(false));
        assert_eq!(editor.selected_leaf(), Some("other"));
    }

    #[test]
    fn test_select_hides_toggle() {
        let mut editor = LeafEditor::new(store(&[("id", "Id")]), "", policy(true, false));
        assert_eq!(editor.select_leaf(&leaf("id", &[0])).unwrap().use_as_id, None);

        let mut editor = LeafEditor::new(store(&[("code", "Code")]), "", policy(false, true));
        assert_eq!(editor.select_leaf(&leaf("code", &[0])).unwrap().use_as_id, None);
    }

    #[test]
    fn test_select_multilingual() {
        let mut editor = editor(&[
            ("title_en", "Title en"),
            ("title_de", "Title de"),
            ("title_fr", "Title fr"),
        ]);
        let form = editor.select_leaf(&leaf("title", &[0, 1, 2])).unwrap();
        assert_eq!(form.name, "title_");
        assert_eq!(form.alias, "Title ");
        assert_eq!(form.use_as_id, None);
    }

    #[test]
    fn test_select_errors() {
        let mut editor = editor(&[("a", "A")]);
        let mut branch = leaf("a", &[]);
        branch.leaf = false;
        assert!(matches!(editor.select_leaf(&branch).unwrap_err(), Error::NotALeaf(_)));
        assert!(matches!(
            editor.select_leaf(&leaf("a", &[])).unwrap_err(),
            Error::EmptyLeaf(_)
        ));
        assert!(editor.form().is_none());
        assert!(matches!(editor.on_name_change("x").unwrap_err(), Error::NoSelection));
    }

    #[test]
    fn test_singleton_rename_leaves_second_field() {
        let mut editor = editor(&[("title_en", "Title"), ("title_de", "Titel")]);
        editor.select_leaf(&leaf("title", &[0, 1])).unwrap();
        editor.on_name_change("caption").unwrap();
        assert_eq!(editor.fields()[0].name, "caption");
        assert_eq!(editor.fields()[1], Field::new("title_de", "Titel"));
        assert_eq!(editor.form().unwrap().name, "caption");
    }

    #[test]
    fn test_multilingual_enabled_broadcast() {
        let mut editor = editor(&[("t_en", ""), ("t_de", ""), ("t_fr", ""), ("u", "")]);
        editor.select_leaf(&leaf("t", &[0, 1, 2])).unwrap();
        editor.on_enabled_change(false).unwrap();
        let enabled: Vec<_> = editor.fields().iter().map(|f| f.enabled).collect();
        assert_eq!(enabled, [false, false, false, true]);
        editor.on_enabled_change(true).unwrap();
        assert!(editor.fields().iter().all(|f| f.enabled));
    }

    #[test]
    fn test_singleton_enabled_broadcast() {
        let mut editor = editor(&[("a", ""), ("b", "")]);
        editor.select_leaf(&leaf("a", &[0, 1])).unwrap();
        editor.on_enabled_change(false).unwrap();
        assert!(editor.fields().iter().all(|f| !f.enabled));
    }

    #[test]
    fn test_multilingual_rename() {
        let mut editor = editor(&[
            ("title_en", "Title_en"),
            ("title_de", "Title_de"),
            ("title_fr", "Title_fr"),
        ]);
        editor.select_leaf(&leaf("title", &[0, 1, 2])).unwrap();
        editor.on_name_change("caption_").unwrap();
        editor.on_alias_change("Caption_").unwrap();
        let fields: Vec<_> = editor
            .fields()
            .iter()
            .map(|f| (f.name.as_str(), f.alias.as_str()))
            .collect();
        assert_eq!(
            fields,
            [
                ("caption_en", "Caption_en"),
                ("caption_de", "Caption_de"),
                ("caption_fr", "Caption_fr")
            ]
        );
    }

    #[test]
    fn test_identifier_exclusive() {
        let mut editor = editor(&[("a", ""), ("b", ""), ("c", "")]);
        editor.select_leaf(&leaf("a", &[0])).unwrap();
        editor.on_use_as_id_change(true).unwrap();
        assert_eq!(editor.use_as_id(), "a");
        editor.select_leaf(&leaf("b", &[1])).unwrap();
        editor.on_use_as_id_change(true).unwrap();
        assert_eq!(editor.use_as_id(), "b");
        // Reselecting the previous identifier shows it unchecked.
        let form = editor.select_leaf(&leaf("a", &[0])).unwrap();
        assert_eq!(form.use_as_id, Some(false));
        editor.select_leaf(&leaf("b", &[1])).unwrap();
        editor.on_use_as_id_change(false).unwrap();
        assert_eq!(editor.use_as_id(), "");
    }

    #[test]
    fn test_identifier_not_offered() {
        let mut editor = LeafEditor::new(
            store(&[("id", "Id"), ("t_en", ""), ("t_de", ""), ("t_fr", "")]),
            "",
            policy(true, true),
        );
        editor.select_leaf(&leaf("id", &[0])).unwrap();
        assert!(matches!(
            editor.on_use_as_id_change(true).unwrap_err(),
            Error::IdentifierNotOffered(ref leaf) if leaf == "id"
        ));
        editor.select_leaf(&leaf("t", &[1, 2, 3])).unwrap();
        assert!(matches!(
            editor.on_use_as_id_change(true).unwrap_err(),
            Error::IdentifierNotOffered(_)
        ));
        assert_eq!(editor.use_as_id(), "");

        let mut editor = LeafEditor::new(store(&[("code", "Code")]), "code", policy(false, true));
        editor.select_leaf(&leaf("code", &[0])).unwrap();
        assert!(matches!(
            editor.on_use_as_id_change(false).unwrap_err(),
            Error::IdentifierNotOffered(_)
        ));
        assert_eq!(editor.use_as_id(), "code");
        assert_eq!(editor.form().unwrap().use_as_id, None);
    }

    #[test]
    fn test_select_missing_field() {
        let mut editor = editor(&[("a", "A")]);
        editor.select_leaf(&leaf("a", &[0])).unwrap();
        assert!(matches!(
            editor.select_leaf(&leaf("b", &[0, 4])).unwrap_err(),
            Error::FieldResolution { ref path, index: 4 } if path == "b"
        ));
        assert!(editor.form().is_none());
    }

    #[test]
    fn test_save_closes_editor() {
        let mut editor = editor(&[("a", "A")]);
        editor.select_leaf(&leaf("a", &[0])).unwrap();
        editor.on_alias_change("").unwrap();
        editor.on_use_as_id_change(true).unwrap();
        let mut saved = None;
        editor
            .save(&mut |s: &Submission<'_>| -> Result<()> {
                saved = Some(serde_json::to_value(s)?);
                Ok(())
            })
            .unwrap();
        assert!(editor.form().is_none());
        insta::assert_json_snapshot!(saved.unwrap(), @r#"
        {
          "fieldsConfig": [
            {
              "name": "a",
              "alias": "",
              "enabled": true
            }
          ],
          "useAsId": "a"
        }
        "#);
    }

    #[test]
    fn test_failed_save_keeps_edits() {
        let mut editor = editor(&[("a", "A")]);
        editor.select_leaf(&leaf("a", &[0])).unwrap();
        editor.on_name_change("b").unwrap();
        let result = editor.save(&mut |_: &Submission<'_>| -> Result<()> {
            Err(Error::Io(std::io::Error::other("unreachable service")))
        });
        assert!(matches!(result.unwrap_err(), Error::Io(_)));
        assert!(editor.form().is_none());
        let (fields, _) = editor.into_parts();
        assert_eq!(fields[0].name, "b");
    }

    #[test]
    fn test_merge_into() {
        let fields = store(&[("a", "A")]);
        let submission = Submission {
            fields_config: &fields,
            use_as_id: "a",
        };
        let mut document = serde_json::json!({"id": "roads", "useAsId": "", "fieldsConfig": []});
        submission.merge_into(&mut document).unwrap();
        assert_eq!(document["id"], "roads");
        assert_eq!(document["useAsId"], "a");
        assert_eq!(document["fieldsConfig"][0]["alias"], "A");
        assert!(matches!(
            submission.merge_into(&mut serde_json::json!([])).unwrap_err(),
            Error::InvalidDocument(_)
        ));
    }
}
