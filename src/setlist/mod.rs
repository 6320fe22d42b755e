// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Setlist storage and validation.
//!
//! The setlist is a JSON document: a `base_path` that relative song paths
//! resolve against, the ordered `songs` array, and an optional `detection`
//! section tuning the loop-back heuristic. The operator edits `base_path`
//! by hand; automated saves only ever rewrite the song order.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::{Error, Result};

/// Thresholds for loop-back detection, in seconds.
///
/// The defaults suit typical song-length material; short or unusually
/// structured projects can override them per setlist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Positions below this count as "back at the project start"
    #[serde(default = "default_wrap_window")]
    pub wrap_window: f64,
    /// The previous sample must exceed this for a backward jump to count
    #[serde(default = "default_min_travel")]
    pub min_travel: f64,
    /// A previous sample within this distance of the end point also counts
    #[serde(default = "default_end_margin")]
    pub end_margin: f64,
}

fn default_wrap_window() -> f64 {
    10.0
}
fn default_min_travel() -> f64 {
    50.0
}
fn default_end_margin() -> f64 {
    5.0
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            wrap_window: default_wrap_window(),
            min_travel: default_min_travel(),
            end_margin: default_end_margin(),
        }
    }
}

/// One song in the setlist. `path` may be relative to the setlist's base path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetlistEntry {
    /// Display name
    pub name: String,
    /// Project file path, relative or absolute
    pub path: String,
}

/// An ordered setlist plus the base path its relative song paths resolve against
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Setlist {
    /// Folder that relative song paths are joined onto
    pub base_path: PathBuf,
    /// Songs in playback order
    #[serde(rename = "songs")]
    pub entries: Vec<SetlistEntry>,
    /// Loop-back detection tunables
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl Setlist {
    /// Load and validate a setlist document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::ConfigMissing(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        let setlist = Self::from_json(&text)?;

        info!("setlist loaded: {} songs", setlist.entries.len());
        for (i, entry) in setlist.entries.iter().enumerate() {
            info!("  {}. {}", i + 1, entry.name);
        }
        Ok(setlist)
    }

    /// Parse and validate a setlist from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::ConfigMalformed(e.to_string()))?;

        let doc = value
            .as_object()
            .ok_or_else(|| Error::SchemaInvalid("document must be an object".to_string()))?;
        if !doc.contains_key("base_path") {
            return Err(Error::SchemaInvalid("missing 'base_path' key".to_string()));
        }
        let songs = doc
            .get("songs")
            .ok_or_else(|| Error::SchemaInvalid("missing 'songs' array".to_string()))?
            .as_array()
            .ok_or_else(|| Error::SchemaInvalid("'songs' must be an array".to_string()))?;
        if songs.is_empty() {
            return Err(Error::SchemaInvalid("setlist contains no songs".to_string()));
        }

        serde_json::from_value(value).map_err(|e| Error::SchemaInvalid(e.to_string()))
    }

    /// Persist the current song order back to the setlist document.
    ///
    /// Only the `songs` array is rewritten. `base_path` and any other keys
    /// are operator-owned and left as found on disk; if the document has
    /// gone missing or unreadable, a fresh one is written from memory.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut doc = fs::read_to_string(path)
            .ok()
            .and_then(|text| serde_json::from_str::<Value>(&text).ok())
            .filter(Value::is_object)
            .unwrap_or_else(|| json!({ "base_path": self.base_path }));

        doc["songs"] =
            serde_json::to_value(&self.entries).map_err(|e| Error::PersistFailure(e.to_string()))?;
        let text =
            serde_json::to_string_pretty(&doc).map_err(|e| Error::PersistFailure(e.to_string()))?;
        fs::write(path, text).map_err(|e| Error::PersistFailure(e.to_string()))?;

        info!("setlist saved");
        Ok(())
    }

    /// Resolve a song path against the base path. Absolute paths pass through.
    ///
    /// Pure; performs no I/O.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_path.join(p)
        }
    }

    /// Number of songs in the setlist
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the setlist has no songs (never the case after a successful load)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "base_path": "/shows/tour",
        "songs": [
            { "name": "Opener", "path": "opener.rpp" },
            { "name": "Closer", "path": "/absolute/closer.rpp" }
        ]
    }"#;

    #[test]
    fn test_load_valid_setlist() {
        let setlist = Setlist::from_json(VALID).unwrap();
        assert_eq!(setlist.len(), 2);
        assert_eq!(setlist.base_path, PathBuf::from("/shows/tour"));
        assert_eq!(setlist.entries[0].name, "Opener");
        assert_eq!(setlist.entries[1].path, "/absolute/closer.rpp");
        assert_eq!(setlist.detection, DetectionConfig::default());
    }

    #[test]
    fn test_entries_keep_file_order() {
        let text = r#"{
            "base_path": "/b",
            "songs": [
                { "name": "C", "path": "c" },
                { "name": "A", "path": "a" },
                { "name": "B", "path": "b" }
            ]
        }"#;
        let setlist = Setlist::from_json(text).unwrap();
        let names: Vec<&str> = setlist.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_missing_file_is_config_missing() {
        let err = Setlist::load("/no/such/setlist.json").unwrap_err();
        assert!(matches!(err, Error::ConfigMissing(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Setlist::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::ConfigMalformed(_)));
    }

    #[test]
    fn test_missing_base_path_is_schema_invalid() {
        let err = Setlist::from_json(r#"{ "songs": [ { "name": "A", "path": "a" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, Error::SchemaInvalid(_)));
    }

    #[test]
    fn test_missing_songs_is_schema_invalid() {
        let err = Setlist::from_json(r#"{ "base_path": "/b" }"#).unwrap_err();
        assert!(matches!(err, Error::SchemaInvalid(_)));
    }

    #[test]
    fn test_songs_not_an_array_is_schema_invalid() {
        let err = Setlist::from_json(r#"{ "base_path": "/b", "songs": "nope" }"#).unwrap_err();
        assert!(matches!(err, Error::SchemaInvalid(_)));
    }

    #[test]
    fn test_empty_songs_is_schema_invalid() {
        let err = Setlist::from_json(r#"{ "base_path": "/b", "songs": [] }"#).unwrap_err();
        assert!(matches!(err, Error::SchemaInvalid(_)));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let setlist = Setlist::from_json(VALID).unwrap();
        assert_eq!(
            setlist.resolve("opener.rpp"),
            PathBuf::from("/shows/tour/opener.rpp")
        );
        assert_eq!(
            setlist.resolve("/absolute/closer.rpp"),
            PathBuf::from("/absolute/closer.rpp")
        );
    }

    #[test]
    fn test_detection_overrides() {
        let text = r#"{
            "base_path": "/b",
            "songs": [ { "name": "A", "path": "a" } ],
            "detection": { "wrap_window": 2.0 }
        }"#;
        let setlist = Setlist::from_json(text).unwrap();
        assert_eq!(setlist.detection.wrap_window, 2.0);
        // unspecified fields keep their defaults
        assert_eq!(setlist.detection.min_travel, 50.0);
        assert_eq!(setlist.detection.end_margin, 5.0);
    }

    #[test]
    fn test_save_rewrites_songs_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setlist.json");
        fs::write(
            &path,
            r#"{
                "base_path": "/operator/edited",
                "songs": [ { "name": "A", "path": "a" } ],
                "detection": { "wrap_window": 3.0 }
            }"#,
        )
        .unwrap();

        let mut setlist = Setlist::load(&path).unwrap();
        setlist.entries.push(SetlistEntry {
            name: "B".to_string(),
            path: "b".to_string(),
        });
        setlist.save(&path).unwrap();

        let reloaded = Setlist::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.base_path, PathBuf::from("/operator/edited"));
        assert_eq!(reloaded.detection.wrap_window, 3.0);
    }

    #[test]
    fn test_save_without_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setlist.json");

        let setlist = Setlist::from_json(VALID).unwrap();
        setlist.save(&path).unwrap();

        let reloaded = Setlist::load(&path).unwrap();
        assert_eq!(reloaded.base_path, setlist.base_path);
        assert_eq!(reloaded.entries, setlist.entries);
    }
}
