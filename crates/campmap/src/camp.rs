//! Core camp types for campmap.
//!
//! This module defines the validated [`Camp`] record, the [`CampDraft`] used to
//! build one, the [`CampUpdate`] changeset applied by the manager, and the
//! [`CampRecord`] shape written to snapshots.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// Population placeholder for camps without a known figure.
pub const UNKNOWN_POPULATION: &str = "N/A";

/// A validated refugee camp.
///
/// Fields are private so a `Camp` can only come out of [`Camp::new`],
/// [`Camp::from_record`] or [`Camp::updated`], all of which validate against a
/// [`Catalog`].
#[derive(Debug, Clone, PartialEq)]
pub struct Camp {
    name: String,
    latitude: f64,
    longitude: f64,
    population: String,
    radar: String,
    icon_type: String,
}

/// Input for constructing a [`Camp`].
///
/// Optional fields fall back to `"N/A"` and the catalog defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampDraft {
    /// Camp name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Free-form population figure.
    pub population: Option<String>,
    /// Radar code.
    pub radar: Option<String>,
    /// Icon category key.
    pub icon_type: Option<String>,
}

impl CampDraft {
    /// Start a draft with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            ..Self::default()
        }
    }

    /// Set the population figure.
    #[must_use]
    pub fn population(mut self, population: impl Into<String>) -> Self {
        self.population = Some(population.into());
        self
    }

    /// Set the radar code.
    #[must_use]
    pub fn radar(mut self, radar: impl Into<String>) -> Self {
        self.radar = Some(radar.into());
        self
    }

    /// Set the icon category.
    #[must_use]
    pub fn icon_type(mut self, icon_type: impl Into<String>) -> Self {
        self.icon_type = Some(icon_type.into());
        self
    }
}

/// A set of field changes for an existing camp.
///
/// Only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampUpdate {
    /// New name.
    pub name: Option<String>,
    /// New latitude.
    pub latitude: Option<f64>,
    /// New longitude.
    pub longitude: Option<f64>,
    /// New population figure.
    pub population: Option<String>,
    /// New radar code.
    pub radar: Option<String>,
    /// New icon category.
    pub icon_type: Option<String>,
}

impl CampUpdate {
    /// Check whether the changeset carries no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.population.is_none()
            && self.radar.is_none()
            && self.icon_type.is_none()
    }
}

/// Resolved marker image for a camp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRef {
    /// Image path relative to the site root.
    pub path: String,
    /// Marker size in pixels.
    pub size: u32,
}

/// Serialized form of a camp, as stored in snapshots and fed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampRecord {
    /// Camp name.
    pub name: String,
    /// `[latitude, longitude]`.
    pub coords: [f64; 2],
    /// Population figure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<String>,
    /// Radar code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radar: Option<String>,
    /// Marker image, derived from `icon_type` and ignored on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconRef>,
    /// Icon category key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
}

impl Camp {
    /// Build and validate a camp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is blank, a coordinate is not a
    /// finite number, or the radar or icon type is not in the catalog.
    pub fn new(draft: CampDraft, catalog: &Catalog) -> Result<Self> {
        let camp = Self {
            name: draft.name,
            latitude: draft.latitude,
            longitude: draft.longitude,
            population: draft
                .population
                .unwrap_or_else(|| UNKNOWN_POPULATION.to_string()),
            radar: draft
                .radar
                .unwrap_or_else(|| catalog.default_radar.clone()),
            icon_type: draft
                .icon_type
                .unwrap_or_else(|| catalog.default_icon.clone()),
        };
        camp.validate(catalog)?;
        Ok(camp)
    }

    /// Rebuild a camp from its serialized form.
    ///
    /// The stored icon block is ignored; it is recomputed from `icon_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] under the same rules as [`Camp::new`].
    pub fn from_record(record: CampRecord, catalog: &Catalog) -> Result<Self> {
        let [latitude, longitude] = record.coords;
        Self::new(
            CampDraft {
                name: record.name,
                latitude,
                longitude,
                population: record.population,
                radar: record.radar,
                icon_type: record.icon_type,
            },
            catalog,
        )
    }

    /// Serialize the camp, resolving its icon through the catalog.
    #[must_use]
    pub fn to_record(&self, catalog: &Catalog) -> CampRecord {
        let icon = catalog.icon(&self.icon_type).and_then(|category| {
            catalog.icon_path(&category.key).map(|path| IconRef {
                path,
                size: category.size,
            })
        });
        CampRecord {
            name: self.name.clone(),
            coords: [self.latitude, self.longitude],
            population: Some(self.population.clone()),
            radar: Some(self.radar.clone()),
            icon,
            icon_type: Some(self.icon_type.clone()),
        }
    }

    /// Return a copy of this camp with `changes` applied and re-validated.
    ///
    /// `self` is left untouched whether or not validation passes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the changed camp is invalid.
    pub fn updated(&self, changes: &CampUpdate, catalog: &Catalog) -> Result<Self> {
        let mut next = self.clone();
        if let Some(name) = &changes.name {
            next.name.clone_from(name);
        }
        if let Some(latitude) = changes.latitude {
            next.latitude = latitude;
        }
        if let Some(longitude) = changes.longitude {
            next.longitude = longitude;
        }
        if let Some(population) = &changes.population {
            next.population.clone_from(population);
        }
        if let Some(radar) = &changes.radar {
            next.radar.clone_from(radar);
        }
        if let Some(icon_type) = &changes.icon_type {
            next.icon_type.clone_from(icon_type);
        }
        next.validate(catalog)?;
        Ok(next)
    }

    /// Check every field against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] describing the first invalid field.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("camp name is required"));
        }

        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(Error::validation(format!(
                "invalid coordinates for {}",
                self.name
            )));
        }

        if !catalog.has_radar(&self.radar) {
            return Err(Error::validation(format!(
                "invalid radar type: {}. Accepted values: {:?}",
                self.radar, catalog.radar_types
            )));
        }

        if catalog.icon(&self.icon_type).is_none() {
            return Err(Error::validation(format!(
                "invalid icon type: {}. Accepted values: {:?}",
                self.icon_type,
                catalog.icon_keys().collect::<Vec<_>>()
            )));
        }

        Ok(())
    }

    /// Camp name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Population figure as entered.
    #[must_use]
    pub fn population(&self) -> &str {
        &self.population
    }

    /// Radar code.
    #[must_use]
    pub fn radar(&self) -> &str {
        &self.radar
    }

    /// Icon category key.
    #[must_use]
    pub fn icon_type(&self) -> &str {
        &self.icon_type
    }
}

impl std::fmt::Display for Camp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Camp({}, {}, {})", self.name, self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::default()
    }

    #[test]
    fn test_camp_new_with_defaults() {
        let camp = Camp::new(CampDraft::new("Kakuma", 3.72, 34.86), &catalog()).unwrap();

        assert_eq!(camp.name(), "Kakuma");
        assert!((camp.latitude() - 3.72).abs() < f64::EPSILON);
        assert_eq!(camp.population(), "N/A");
        assert_eq!(camp.radar(), "VH");
        assert_eq!(camp.icon_type(), "blue");
    }

    #[test]
    fn test_camp_new_with_all_fields() {
        let draft = CampDraft::new("Dadaab", 0.05, 40.31)
            .population("218000")
            .radar("VV")
            .icon_type("green");
        let camp = Camp::new(draft, &catalog()).unwrap();

        assert_eq!(camp.population(), "218000");
        assert_eq!(camp.radar(), "VV");
        assert_eq!(camp.icon_type(), "green");
    }

    #[test]
    fn test_camp_rejects_blank_name() {
        let err = Camp::new(CampDraft::new("   ", 1.0, 2.0), &catalog()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("name is required"));
    }

    #[test]
    fn test_camp_rejects_non_finite_coordinates() {
        let err = Camp::new(CampDraft::new("Nowhere", f64::NAN, 2.0), &catalog()).unwrap_err();
        assert!(err.to_string().contains("invalid coordinates for Nowhere"));

        let err =
            Camp::new(CampDraft::new("Nowhere", 1.0, f64::INFINITY), &catalog()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_camp_accepts_out_of_range_coordinates() {
        let camp = Camp::new(CampDraft::new("Far", 123.0, -400.0), &catalog());
        assert!(camp.is_ok());
    }

    #[test]
    fn test_camp_rejects_unknown_radar() {
        let draft = CampDraft::new("Camp", 1.0, 2.0).radar("HH");
        let err = Camp::new(draft, &catalog()).unwrap_err();
        assert!(err.to_string().contains("invalid radar type: HH"));
    }

    #[test]
    fn test_camp_rejects_unknown_icon() {
        let draft = CampDraft::new("Camp", 1.0, 2.0).icon_type("purple");
        let err = Camp::new(draft, &catalog()).unwrap_err();
        assert!(err.to_string().contains("invalid icon type: purple"));
    }

    #[test]
    fn test_camp_with_alternate_catalog() {
        let catalog = Catalog {
            radar_types: vec!["HH".to_string()],
            default_radar: "HH".to_string(),
            ..Catalog::default()
        };
        let camp = Camp::new(CampDraft::new("Alt", 1.0, 2.0), &catalog).unwrap();
        assert_eq!(camp.radar(), "HH");

        let draft = CampDraft::new("Alt", 1.0, 2.0).radar("VH");
        assert!(Camp::new(draft, &catalog).is_err());
    }

    #[test]
    fn test_to_record_resolves_icon() {
        let draft = CampDraft::new("Camp A", 10.0, 20.0)
            .population("5000")
            .icon_type("grey");
        let record = Camp::new(draft, &catalog()).unwrap().to_record(&catalog());

        assert_eq!(record.coords, [10.0, 20.0]);
        assert_eq!(record.population.as_deref(), Some("5000"));
        assert_eq!(
            record.icon,
            Some(IconRef {
                path: "assets/icons/grey_house.png".to_string(),
                size: 30,
            })
        );
    }

    #[test]
    fn test_record_round_trip() {
        let catalog = catalog();
        let draft = CampDraft::new("Minawao", 10.56, 13.85)
            .population("N/A")
            .radar("VV")
            .icon_type("green");
        let camp = Camp::new(draft, &catalog).unwrap();

        let json = serde_json::to_string(&camp.to_record(&catalog)).unwrap();
        let record: CampRecord = serde_json::from_str(&json).unwrap();
        let restored = Camp::from_record(record, &catalog).unwrap();

        assert_eq!(camp, restored);
    }

    #[test]
    fn test_from_record_missing_optional_fields() {
        let json = r#"{"name": "Bare", "coords": [1.5, 2.5]}"#;
        let record: CampRecord = serde_json::from_str(json).unwrap();
        let camp = Camp::from_record(record, &catalog()).unwrap();

        assert_eq!(camp.population(), "N/A");
        assert_eq!(camp.radar(), "VH");
        assert_eq!(camp.icon_type(), "blue");
    }

    #[test]
    fn test_from_record_ignores_stored_icon() {
        let json = r#"{
            "name": "Stale",
            "coords": [1.0, 2.0],
            "icon": {"path": "old/path.png", "size": 99},
            "icon_type": "green"
        }"#;
        let record: CampRecord = serde_json::from_str(json).unwrap();
        let camp = Camp::from_record(record, &catalog()).unwrap();
        let icon = camp.to_record(&catalog()).icon.unwrap();

        assert_eq!(icon.path, "assets/icons/green_house.png");
        assert_eq!(icon.size, 30);
    }

    #[test]
    fn test_from_record_validates() {
        let json = r#"{"name": "Bad", "coords": [1.0, 2.0], "radar": "XX"}"#;
        let record: CampRecord = serde_json::from_str(json).unwrap();
        assert!(Camp::from_record(record, &catalog()).is_err());
    }

    #[test]
    fn test_updated_applies_only_given_fields() {
        let catalog = catalog();
        let camp = Camp::new(CampDraft::new("Camp", 1.0, 2.0).population("10"), &catalog).unwrap();
        let changes = CampUpdate {
            latitude: Some(5.0),
            icon_type: Some("grey".to_string()),
            ..CampUpdate::default()
        };
        let next = camp.updated(&changes, &catalog).unwrap();

        assert!((next.latitude() - 5.0).abs() < f64::EPSILON);
        assert!((next.longitude() - 2.0).abs() < f64::EPSILON);
        assert_eq!(next.population(), "10");
        assert_eq!(next.icon_type(), "grey");
    }

    #[test]
    fn test_updated_leaves_original_on_failure() {
        let catalog = catalog();
        let camp = Camp::new(CampDraft::new("Camp", 1.0, 2.0), &catalog).unwrap();
        let changes = CampUpdate {
            radar: Some("bogus".to_string()),
            ..CampUpdate::default()
        };

        assert!(camp.updated(&changes, &catalog).is_err());
        assert_eq!(camp.radar(), "VH");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(CampUpdate::default().is_empty());
        let changes = CampUpdate {
            population: Some("1".to_string()),
            ..CampUpdate::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_camp_display() {
        let camp = Camp::new(CampDraft::new("Camp", 1.5, 2.5), &catalog()).unwrap();
        assert_eq!(camp.to_string(), "Camp(Camp, 1.5, 2.5)");
    }
}
