//! Type maps loaded from JSON.
//!
//! ```json
//! { "default_type": "Product", "included": { "Book": "BookProduct" } }
//! ```

use crate::error::ConfigError;
use crate::types::{IncludedTypeSet, TypeDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TypeMapConfig {
    /// The type of nodes that carry no `xsi:type` marker.
    pub default_type: String,
    /// `xsi:type` marker to type name.
    #[serde(default)]
    pub included: BTreeMap<String, String>,
}

impl TypeMapConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: TypeMapConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Loading type map from '{}'", path.display());
        let source = fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_type.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_type must not be empty".to_string(),
            ));
        }
        for (marker, type_name) in &self.included {
            if marker.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "xsi:type markers must not be empty".to_string(),
                ));
            }
            if type_name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "type name for marker '{}' must not be empty",
                    marker
                )));
            }
        }
        Ok(())
    }

    pub fn into_type_set(self) -> Result<IncludedTypeSet, ConfigError> {
        self.validate()?;
        let default = TypeDescriptor::new(self.default_type);
        Ok(self
            .included
            .into_iter()
            .fold(IncludedTypeSet::new(default), |set, (marker, type_name)| {
                set.include(&marker, TypeDescriptor::new(type_name))
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IncludedTypeMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_json_builds_type_set() {
        let config = TypeMapConfig::from_json(
            r#"{ "default_type": "Product", "included": { "Book": "BookProduct" } }"#,
        )
        .unwrap();
        let types = config.into_type_set().unwrap();
        assert_eq!(types.try_get(None).unwrap().descriptor.name(), "Product");
        assert_eq!(
            types.try_get(Some("Book")).unwrap().descriptor.name(),
            "BookProduct"
        );
    }

    #[test]
    fn test_included_is_optional() {
        let config = TypeMapConfig::from_json(r#"{ "default_type": "Product" }"#).unwrap();
        assert!(config.included.is_empty());
    }

    #[test]
    fn test_rejects_empty_names() {
        let err = TypeMapConfig::from_json(r#"{ "default_type": " " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = TypeMapConfig::from_json(r#"{ "default_type": "A", "included": { "": "B" } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = TypeMapConfig::from_json(r#"{ "default_type": "A", "included": { "B": "" } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_reports_malformed_json() {
        let err = TypeMapConfig::from_json("{ default_type: }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_type": "Product", "included": {{ "Toy": "ToyProduct" }} }}"#)
            .unwrap();
        let config = TypeMapConfig::from_file(file.path()).unwrap();
        assert_eq!(config.included.get("Toy").map(String::as_str), Some("ToyProduct"));

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            TypeMapConfig::from_file(missing),
            Err(ConfigError::Io(_))
        ));
    }
}
