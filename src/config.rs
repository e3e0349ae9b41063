use crate::{Error, Result};

/// Editor configuration.
///
/// Parsed from a comma-separated parameter string such as `root=features,id-field=gml_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Id of the tree's root node.
    pub root_id: String,
    /// Label of the tree's root node.
    pub root_name: String,
    /// Field name reserved for the service's own identifier.
    pub canonical_id_field: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_id: "root".into(),
            root_name: "Mapping".into(),
            canonical_id_field: "id".into(),
        }
    }
}

impl TryFrom<&str> for Config {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        let mut config = Self::default();
        for param in s.split(',').filter(|s| !s.is_empty()) {
            let Some((key, value)) = param.split_once('=') else {
                return Err(Error::InvalidConfig(format!("expected key=value: {param}")));
            };
            match key.trim() {
                "root" => config.root_id = value.to_string(),
                "root-name" => config.root_name = value.to_string(),
                "id-field" => config.canonical_id_field = value.to_string(),
                _ => {
                    return Err(Error::InvalidConfig(format!("unknown parameter: {param}")));
                }
            }
        }
        Ok(config)
    }
}
