//! Content file format detection and parsing.

use std::path::Path;

use rotor_core::{Result, StoreError};
use serde::de::DeserializeOwned;

/// Supported content file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yml, .yaml)
    Yaml,
}

impl ContentFormat {
    /// Detects the format from a file path based on extension.
    ///
    /// # Returns
    ///
    /// `Some(format)` if the extension is recognized, `None` otherwise.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Detects the format from a file extension string.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        [Self::Json, Self::Yaml]
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Returns all file extensions for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::Yaml => &["yml", "yaml"],
        }
    }

    /// Parses `bytes` as a list of `T`.
    ///
    /// `path` only appears in the error.
    pub fn parse_list<T: DeserializeOwned>(&self, path: &str, bytes: &[u8]) -> Result<Vec<T>> {
        let parsed = match self {
            Self::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_slice(bytes).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| StoreError::parse(path, reason))
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Key {
        id: u32,
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ContentFormat::from_path(Path::new("keys/keys.json")),
            Some(ContentFormat::Json)
        );
        assert_eq!(
            ContentFormat::from_path(Path::new("keys.yaml")),
            Some(ContentFormat::Yaml)
        );
        assert_eq!(
            ContentFormat::from_path(Path::new("keys.YML")),
            Some(ContentFormat::Yaml)
        );
        assert_eq!(ContentFormat::from_path(Path::new("keys.csv")), None);
        assert_eq!(ContentFormat::from_path(Path::new("keys")), None);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ContentFormat::Yaml.extensions(), &["yml", "yaml"]);
        assert_eq!(ContentFormat::Json.extensions(), &["json"]);
    }

    #[test]
    fn test_parse_json_list() {
        let keys: Vec<Key> = ContentFormat::Json
            .parse_list("keys.json", br#"[{"id": 1}, {"id": 2}]"#)
            .unwrap();
        assert_eq!(keys, vec![Key { id: 1 }, Key { id: 2 }]);
    }

    #[test]
    fn test_parse_yaml_list() {
        let keys: Vec<Key> = ContentFormat::Yaml
            .parse_list("keys.yaml", b"- id: 7\n- id: 8\n")
            .unwrap();
        assert_eq!(keys, vec![Key { id: 7 }, Key { id: 8 }]);
    }

    #[test]
    fn test_parse_error_names_path() {
        let err = ContentFormat::Json
            .parse_list::<Key>("keys.json", b"{not json")
            .unwrap_err();
        assert!(err.to_string().contains("keys.json"));
    }
}
