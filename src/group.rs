//! The fields behind one tree leaf.
//!
//! A leaf with more than two fields is a multilingual family: every field shares a name and alias
//! prefix and ends in its own language code. The code is always the last
//! [`LANGUAGE_SUFFIX_LEN`] characters; it is sliced, never parsed.
use crate::mapping::{Field, FieldsConfig};

/// Width of the language code at the end of a multilingual field's name and alias.
pub const LANGUAGE_SUFFIX_LEN: usize = 2;

/// A leaf's field indices, classified by how edits apply to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldGroup {
    /// Name and alias edits go to the first field only.
    Singleton(Vec<usize>),
    /// Name and alias edits replace the shared prefix of every field.
    Multilingual(Vec<usize>),
}

impl FieldGroup {
    pub fn classify(fields: &[usize]) -> Self {
        if fields.len() > 2 {
            Self::Multilingual(fields.to_vec())
        } else {
            Self::Singleton(fields.to_vec())
        }
    }

    pub fn indices(&self) -> &[usize] {
        match self {
            Self::Singleton(fields) | Self::Multilingual(fields) => fields,
        }
    }

    pub fn is_multilingual(&self) -> bool {
        matches!(self, Self::Multilingual(_))
    }

    pub fn first(&self) -> Option<usize> {
        self.indices().first().copied()
    }

    /// Return the name shown for this group.
    pub fn display_name<'a>(&self, store: &'a FieldsConfig) -> &'a str {
        self.display(store, |f| &f.name)
    }

    /// Return the alias shown for this group.
    pub fn display_alias<'a>(&self, store: &'a FieldsConfig) -> &'a str {
        self.display(store, |f| &f.alias)
    }

    fn display<'a>(
        &self,
        store: &'a FieldsConfig,
        get: impl Fn(&'a Field) -> &'a String,
    ) -> &'a str {
        let Some(first) = self.first() else {
            return "";
        };
        let value = get(&store[first]);
        match self {
            Self::Singleton(_) => value,
            Self::Multilingual(_) => split_suffix(value).0,
        }
    }

    pub fn set_name(&self, store: &mut FieldsConfig, value: &str) {
        match self {
            Self::Singleton(_) => {
                if let Some(first) = self.first() {
                    store[first].name = value.to_string();
                }
            }
            Self::Multilingual(fields) => {
                for &i in fields {
                    store[i].name = replace_prefix(&store[i].name, value);
                }
            }
        }
    }

    pub fn set_alias(&self, store: &mut FieldsConfig, value: &str) {
        match self {
            Self::Singleton(_) => {
                if let Some(first) = self.first() {
                    store[first].alias = value.to_string();
                }
            }
            Self::Multilingual(fields) => {
                for &i in fields {
                    store[i].alias = replace_prefix(&store[i].alias, value);
                }
            }
        }
    }

    /// Enable or disable every field in the group.
    pub fn set_enabled(&self, store: &mut FieldsConfig, enabled: bool) {
        for &i in self.indices() {
            store[i].enabled = enabled;
        }
    }
}

/// Split `value` into its prefix and its trailing language code.
///
/// Values shorter than the code are all suffix.
pub fn split_suffix(value: &str) -> (&str, &str) {
    let at = value
        .char_indices()
        .rev()
        .nth(LANGUAGE_SUFFIX_LEN - 1)
        .map_or(0, |(i, _)| i);
    value.split_at(at)
}

fn replace_prefix(value: &str, prefix: &str) -> String {
    let (_, suffix) = split_suffix(value);
    format!("{prefix}{suffix}")
}
