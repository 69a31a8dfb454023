//! JSON snapshots of the camp collection.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::CampManager;
use crate::camp::{Camp, CampRecord};
use crate::config::create_dir;
use crate::error::{Error, Result};

/// Snapshot format version written to the metadata block.
pub const SNAPSHOT_VERSION: &str = "1.0";

/// The on-disk document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every camp, in collection order.
    #[serde(default)]
    pub camps: Vec<CampRecord>,
    /// Summary written alongside the camps; not required on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SnapshotMetadata>,
}

/// Summary block of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Number of camps in the snapshot.
    pub total_camps: usize,
    /// Format version.
    pub version: String,
    /// When the snapshot was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl CampManager {
    /// Build the snapshot document for the current collection.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            camps: self
                .camps
                .iter()
                .map(|camp| camp.to_record(&self.catalog))
                .collect(),
            metadata: Some(SnapshotMetadata {
                total_camps: self.camps.len(),
                version: SNAPSHOT_VERSION.to_string(),
                saved_at: Some(Utc::now()),
            }),
        }
    }

    /// Save to the default snapshot path and return it.
    ///
    /// # Errors
    ///
    /// See [`save_to`](Self::save_to).
    pub fn save(&self) -> Result<PathBuf> {
        let path = self.snapshot_path.clone();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the collection as pretty-printed JSON, replacing any existing file.
    ///
    /// Missing parent directories are created. The in-memory collection is never
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryCreate`] or [`Error::FileWrite`] on I/O failure.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Saved {} camps to {}", self.camps.len(), path.display());
        Ok(())
    }

    /// Load from the default snapshot path, returning the number of camps.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub fn load(&mut self) -> Result<usize> {
        let path = self.snapshot_path.clone();
        self.load_from(&path)
    }

    /// Replace the collection with the contents of a snapshot file.
    ///
    /// Loading is all-or-nothing: if the file is missing, unreadable, malformed,
    /// holds an invalid camp or repeats a name, the current collection is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the path does not exist,
    /// [`Error::FileRead`] or [`Error::Json`] for unreadable or malformed files,
    /// and [`Error::Validation`] or [`Error::DuplicateName`] for bad entries.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::FileRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let snapshot: Snapshot = serde_json::from_str(&text)?;
        if let Some(metadata) = &snapshot.metadata {
            debug!(
                "Snapshot version {} declares {} camps",
                metadata.version, metadata.total_camps
            );
        }

        let camps = snapshot
            .camps
            .into_iter()
            .map(|record| Camp::from_record(record, &self.catalog))
            .collect::<Result<Vec<_>>>()?;

        self.replace_all(camps)?;
        info!("Loaded {} camps from {}", self.camps.len(), path.display());
        Ok(self.camps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camp::CampDraft;

    fn sample_manager() -> CampManager {
        let mut manager = CampManager::default();
        manager
            .add(
                CampDraft::new("Kakuma", 3.7189, 34.8671)
                    .population("196000")
                    .icon_type("blue"),
            )
            .unwrap();
        manager
            .add(
                CampDraft::new("Bidi Bidi", 3.4833, 31.3833)
                    .radar("VV")
                    .icon_type("green"),
            )
            .unwrap();
        manager
            .add(CampDraft::new("Zaatari", 32.2944, 36.3236).icon_type("grey"))
            .unwrap();
        manager
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camps.json");
        let original = sample_manager();
        original.save_to(&path).unwrap();

        let mut restored = CampManager::default();
        let count = restored.load_from(&path).unwrap();

        assert_eq!(count, 3);
        assert_eq!(restored.camps(), original.camps());
    }

    #[test]
    fn test_snapshot_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camps.json");
        sample_manager().save_to(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["metadata"]["total_camps"], 3);
        assert_eq!(value["metadata"]["version"], "1.0");
        let first = &value["camps"][0];
        assert_eq!(first["name"], "Kakuma");
        assert_eq!(first["coords"][0], 3.7189);
        assert_eq!(first["population"], "196000");
        assert_eq!(first["radar"], "VH");
        assert_eq!(first["icon"]["path"], "assets/icons/blue_house.png");
        assert_eq!(first["icon"]["size"], 30);
        assert_eq!(first["icon_type"], "blue");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/camps.json");

        sample_manager().save_to(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camps.json");
        sample_manager().save_to(&path).unwrap();
        CampManager::default().save_to(&path).unwrap();

        let mut manager = sample_manager();
        assert_eq!(manager.load_from(&path).unwrap(), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_save_failure_leaves_collection() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let manager = sample_manager();
        let before = manager.camps().to_vec();

        let err = manager.save_to(blocker.join("camps.json")).unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));

        let err = manager
            .save_to(blocker.join("nested/camps.json"))
            .unwrap_err();
        assert!(matches!(err, Error::DirectoryCreate { .. }));

        assert_eq!(manager.count(), 3);
        assert_eq!(manager.camps(), before.as_slice());
    }

    #[test]
    fn test_save_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let manager = sample_manager().with_snapshot_path(dir.path().join("snap.json"));

        let path = manager.save().unwrap();
        assert_eq!(path, dir.path().join("snap.json"));
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file_keeps_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = sample_manager();

        let err = manager.load_from(dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_file_not_found());
        assert_eq!(manager.count(), 3);
    }

    #[test]
    fn test_load_malformed_json_keeps_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camps.json");
        std::fs::write(&path, "{ not json").unwrap();
        let mut manager = sample_manager();

        let err = manager.load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(manager.count(), 3);
    }

    #[test]
    fn test_load_invalid_entry_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camps.json");
        std::fs::write(
            &path,
            r#"{"camps": [
                {"name": "Good", "coords": [1.0, 2.0]},
                {"name": "Bad", "coords": [1.0, 2.0], "icon_type": "purple"}
            ]}"#,
        )
        .unwrap();
        let mut manager = sample_manager();

        let err = manager.load_from(&path).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(manager.count(), 3);
        assert!(manager.find_by_name("Good").is_none());
    }

    #[test]
    fn test_load_duplicate_names_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camps.json");
        std::fs::write(
            &path,
            r#"{"camps": [
                {"name": "Twin", "coords": [1.0, 2.0]},
                {"name": "Twin", "coords": [3.0, 4.0]}
            ]}"#,
        )
        .unwrap();
        let mut manager = CampManager::default();

        assert!(manager.load_from(&path).unwrap_err().is_duplicate());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_load_without_metadata_or_camps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camps.json");
        std::fs::write(&path, "{}").unwrap();
        let mut manager = sample_manager();

        assert_eq!(manager.load_from(&path).unwrap(), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_snapshot_metadata() {
        let snapshot = sample_manager().snapshot();
        let metadata = snapshot.metadata.unwrap();
        assert_eq!(metadata.total_camps, 3);
        assert_eq!(metadata.version, SNAPSHOT_VERSION);
        assert!(metadata.saved_at.is_some());
    }
}
