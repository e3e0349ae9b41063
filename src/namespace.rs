//! Shorten namespace URIs embedded in property paths.
use regex::{NoExpand, Regex};

use crate::mapping::NamespaceTable;

/// Replaces namespace URIs with their short prefixes.
///
/// Patterns are compiled once per [`NamespaceTable`] and applied in table order.
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: Vec<(Regex, String)>,
}

impl Normalizer {
    pub fn new(namespaces: &NamespaceTable) -> Self {
        let rules = namespaces
            .iter()
            .filter(|(_, uri)| !uri.is_empty())
            .map(|(prefix, uri)| {
                let re =
                    Regex::new(&regex::escape(uri)).expect("escaped literal is a valid regex");
                (re, prefix.clone())
            })
            .collect();
        Self { rules }
    }

    pub fn normalize(&self, path: &str) -> String {
        let mut path = path.to_string();
        for (re, prefix) in &self.rules {
            path = re.replace_all(&path, NoExpand(prefix)).into_owned();
        }
        path
    }
}

/// Replace every namespace URI in `path` with its short prefix.
pub fn normalize(path: &str, namespaces: &NamespaceTable) -> String {
    Normalizer::new(namespaces).normalize(path)
}
