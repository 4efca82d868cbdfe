//! Where the places to mint come from.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SourceError;
use crate::place::{builtin_places, PlaceRecord};

/// A pluggable list of places: the built-in collection or a JSON file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaceSource {
    Builtin,
    JsonFile(PathBuf),
}

/// Accepted file layouts: a bare array, or an object with a `places` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlaceFile {
    List(Vec<PlaceRecord>),
    Wrapped { places: Vec<PlaceRecord> },
}

impl PlaceSource {
    /// `None` selects the built-in places.
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => PlaceSource::JsonFile(p),
            None => PlaceSource::Builtin,
        }
    }

    /// Load and validate every place, in mint order.
    pub fn load(&self) -> Result<Vec<PlaceRecord>, SourceError> {
        let places = match self {
            PlaceSource::Builtin => builtin_places(),
            PlaceSource::JsonFile(path) => read_place_file(path)?,
        };
        if places.is_empty() {
            return Err(SourceError::Empty(self.to_string()));
        }
        for (i, place) in places.iter().enumerate() {
            place.validate(i)?;
        }
        tracing::debug!(source = %self, count = places.len(), "places loaded");
        Ok(places)
    }
}

impl std::fmt::Display for PlaceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceSource::Builtin => f.write_str("builtin"),
            PlaceSource::JsonFile(path) => write!(f, "{}", path.display()),
        }
    }
}

fn read_place_file(path: &Path) -> Result<Vec<PlaceRecord>, SourceError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: display.clone(),
        source,
    })?;
    let file: PlaceFile = serde_json::from_str(&contents).map_err(|source| SourceError::Json {
        path: display,
        source,
    })?;
    Ok(match file {
        PlaceFile::List(places) => places,
        PlaceFile::Wrapped { places } => places,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;

    fn write_file(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("places.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn builtin_source_has_three_places() {
        let places = PlaceSource::Builtin.load().unwrap();
        assert_eq!(places.len(), 3);
        assert_eq!(places[0].name, "Colosseum");
    }

    #[test]
    fn loads_bare_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            r#"[{
                "name": "Petra",
                "location": "Ma'an, Jordan",
                "year": "312 BC",
                "description": "Rock-cut city.",
                "imageUrl": "https://travel3.io/images/petra.jpg",
                "documentUrl": "https://travel3.io/docs/petra.pdf",
                "decryption": { "iv": "0102", "privateKey": "abcd" }
            }]"#,
        );
        let places = PlaceSource::JsonFile(path).load().unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].location, "Ma'an, Jordan");
        assert_eq!(places[0].decryption.as_ref().unwrap().iv, "0102");
        assert!(places[0].thumbnail_url.is_none());
    }

    #[test]
    fn loads_wrapped_object() {
        let dir = tempfile::tempdir().unwrap();
        let places = serde_json::json!({ "places": builtin_places() });
        let path = write_file(&dir, &places.to_string());
        let loaded = PlaceSource::JsonFile(path).load().unwrap();
        assert_eq!(loaded, builtin_places());
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "[]");
        assert!(matches!(
            PlaceSource::JsonFile(path).load(),
            Err(SourceError::Empty(_))
        ));
    }

    #[test]
    fn invalid_record_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut places = builtin_places();
        places[1].document_url = String::new();
        let path = write_file(&dir, &serde_json::to_string(&places).unwrap());
        match PlaceSource::JsonFile(path).load() {
            Err(SourceError::Invalid(MetadataError::MissingField { index, field })) => {
                assert_eq!(index, 1);
                assert_eq!(field, "documentUrl");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_file_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let missing = PlaceSource::JsonFile(dir.path().join("nope.json"));
        assert!(matches!(missing.load(), Err(SourceError::Io { .. })));

        let path = write_file(&dir, "{ not json");
        assert!(matches!(
            PlaceSource::JsonFile(path).load(),
            Err(SourceError::Json { .. })
        ));
    }

    #[test]
    fn from_path_selects_source() {
        assert_eq!(PlaceSource::from_path(None), PlaceSource::Builtin);
        assert_eq!(
            PlaceSource::from_path(Some(PathBuf::from("a.json"))),
            PlaceSource::JsonFile(PathBuf::from("a.json"))
        );
    }
}
