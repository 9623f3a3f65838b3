use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelMapError {
    #[error("failed to read label file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid label file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("label key {0:?} is not a non-negative integer index")]
    BadIndex(String),
    #[error("label spec {0:?} must have the form INDEX=LABEL")]
    BadSpec(String),
    #[error("label for index {0} is empty")]
    EmptyLabel(usize),
}

/// On-disk label file: either an index-keyed object or a positional list.
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelFile {
    Keyed(BTreeMap<String, String>),
    Positional(Vec<String>),
}

/// Mapping from output-vector index to detection label.
///
/// Keys are unique by construction; a later entry for the same index
/// replaces the earlier one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelMap {
    labels: HashMap<usize, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, label: impl Into<String>) -> Option<String> {
        self.labels.insert(index, label.into())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Loads a JSON label file.
    ///
    /// Accepts `{"0": "face", "15": "person"}` or `["background", "face"]`.
    /// In the list form, empty strings leave the index unlabeled.
    pub fn from_json_file(path: &Path) -> Result<Self, LabelMapError> {
        let text = fs::read_to_string(path).map_err(|e| LabelMapError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: LabelFile = serde_json::from_str(&text).map_err(|e| LabelMapError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut map = Self::new();
        match file {
            LabelFile::Keyed(raw) => {
                for (key, label) in raw {
                    let index = parse_index(&key)?;
                    map.insert_checked(index, label)?;
                }
            }
            LabelFile::Positional(labels) => {
                for (index, label) in labels.into_iter().enumerate() {
                    if !label.is_empty() {
                        map.insert(index, label);
                    }
                }
            }
        }
        Ok(map)
    }

    /// Parses a single `INDEX=LABEL` pair and adds it to the map.
    pub fn insert_spec(&mut self, spec: &str) -> Result<(), LabelMapError> {
        let (key, label) = spec
            .split_once('=')
            .ok_or_else(|| LabelMapError::BadSpec(spec.to_string()))?;
        let index = parse_index(key)?;
        self.insert_checked(index, label.trim().to_string())
    }

    fn insert_checked(&mut self, index: usize, label: String) -> Result<(), LabelMapError> {
        if label.is_empty() {
            return Err(LabelMapError::EmptyLabel(index));
        }
        self.insert(index, label);
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (index, label) in iter {
            map.insert(index, label);
        }
        map
    }
}

fn parse_index(key: &str) -> Result<usize, LabelMapError> {
    key.trim()
        .parse::<usize>()
        .map_err(|_| LabelMapError::BadIndex(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_iter_and_get() {
        let map: LabelMap = [(0, "a"), (2, "c")].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(0), Some("a"));
        assert_eq!(map.get(1), None);
        assert_eq!(map.get(2), Some("c"));
    }

    #[test]
    fn test_insert_replaces_existing_index() {
        let mut map = LabelMap::new();
        map.insert(1, "cat");
        assert_eq!(map.insert(1, "dog"), Some("cat".to_string()));
        assert_eq!(map.get(1), Some("dog"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_spec() {
        let mut map = LabelMap::new();
        map.insert_spec("0=face").unwrap();
        map.insert_spec(" 15 = person ").unwrap();
        assert_eq!(map.get(0), Some("face"));
        assert_eq!(map.get(15), Some("person"));
    }

    #[test]
    fn test_insert_spec_rejects_malformed() {
        let mut map = LabelMap::new();
        assert!(matches!(
            map.insert_spec("face"),
            Err(LabelMapError::BadSpec(_))
        ));
        assert!(matches!(
            map.insert_spec("-1=face"),
            Err(LabelMapError::BadIndex(_))
        ));
        assert!(matches!(
            map.insert_spec("3="),
            Err(LabelMapError::EmptyLabel(3))
        ));
        assert!(map.is_empty());
    }

    #[test]
    fn test_from_json_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels.json");
        fs::write(&path, r#"{"0": "background", "1": "face"}"#).unwrap();

        let map = LabelMap::from_json_file(&path).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1), Some("face"));
    }

    #[test]
    fn test_from_json_file_positional_list() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels.json");
        fs::write(&path, r#"["", "face", "person"]"#).unwrap();

        let map = LabelMap::from_json_file(&path).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(0), None);
        assert_eq!(map.get(1), Some("face"));
        assert_eq!(map.get(2), Some("person"));
    }

    #[test]
    fn test_from_json_file_missing() {
        let tmp = TempDir::new().unwrap();
        let result = LabelMap::from_json_file(&tmp.path().join("nope.json"));
        assert!(matches!(result, Err(LabelMapError::Read { .. })));
    }

    #[test]
    fn test_from_json_file_rejects_non_numeric_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels.json");
        fs::write(&path, r#"{"face": "0"}"#).unwrap();

        let result = LabelMap::from_json_file(&path);

        assert!(matches!(result, Err(LabelMapError::BadIndex(_))));
    }

    #[test]
    fn test_from_json_file_rejects_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labels.json");
        fs::write(&path, "[1, 2").unwrap();

        let result = LabelMap::from_json_file(&path);

        assert!(matches!(result, Err(LabelMapError::Parse { .. })));
    }
}
