//! Closed sets of radar codes and icon categories.
//!
//! A [`Catalog`] is the immutable vocabulary that camps are validated against.
//! It is loaded as part of [`Config`](crate::Config) and handed to the manager
//! and the renderer, so alternate vocabularies can be used without touching
//! process-wide state.

use serde::{Deserialize, Serialize};

/// Default radar code for new camps.
pub const DEFAULT_RADAR: &str = "VH";

/// Default icon category for new camps.
pub const DEFAULT_ICON: &str = "blue";

/// A display category for camp markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconCategory {
    /// Key stored on each camp (e.g. `blue`).
    pub key: String,
    /// Image file name inside the icons directory.
    pub file: String,
    /// Marker width and height in pixels.
    pub size: u32,
    /// Legend text.
    pub description: String,
}

impl IconCategory {
    /// Create an icon category whose image is `{key}_house.png`.
    #[must_use]
    pub fn house(key: &str, size: u32, description: &str) -> Self {
        Self {
            key: key.to_string(),
            file: format!("{key}_house.png"),
            size,
            description: description.to_string(),
        }
    }
}

/// Radar codes and icon categories accepted on camps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Accepted sensor polarisation codes.
    pub radar_types: Vec<String>,
    /// Radar code used when none is given.
    pub default_radar: String,
    /// Accepted icon categories, in legend order.
    pub icons: Vec<IconCategory>,
    /// Icon category used when none is given.
    pub default_icon: String,
    /// Directory holding icon images, relative to the site root.
    pub icons_dir: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            radar_types: vec!["VH".to_string(), "VV".to_string()],
            default_radar: DEFAULT_RADAR.to_string(),
            icons: vec![
                IconCategory::house("blue", 30, "Site mapping data"),
                IconCategory::house("green", 30, "OpenStreetMap data"),
                IconCategory::house("grey", 30, "No data"),
            ],
            default_icon: DEFAULT_ICON.to_string(),
            icons_dir: "assets/icons".to_string(),
        }
    }
}

impl Catalog {
    /// Check whether `radar` is an accepted radar code.
    #[must_use]
    pub fn has_radar(&self, radar: &str) -> bool {
        self.radar_types.iter().any(|r| r == radar)
    }

    /// Look up an icon category by key.
    #[must_use]
    pub fn icon(&self, key: &str) -> Option<&IconCategory> {
        self.icons.iter().find(|icon| icon.key == key)
    }

    /// Keys of all icon categories, in legend order.
    pub fn icon_keys(&self) -> impl Iterator<Item = &str> {
        self.icons.iter().map(|icon| icon.key.as_str())
    }

    /// Relative path of the image for an icon category.
    ///
    /// Returns `None` if the key is not part of this catalog.
    #[must_use]
    pub fn icon_path(&self, key: &str) -> Option<String> {
        self.icon(key)
            .map(|icon| format!("{}/{}", self.icons_dir.trim_end_matches('/'), icon.file))
    }

    /// Check that the catalog is internally consistent.
    ///
    /// Returns a description of the first problem found.
    pub(crate) fn check(&self) -> std::result::Result<(), String> {
        if self.radar_types.is_empty() {
            return Err("radar_types must not be empty".to_string());
        }
        if !self.has_radar(&self.default_radar) {
            return Err(format!(
                "default_radar '{}' is not one of {:?}",
                self.default_radar, self.radar_types
            ));
        }
        if self.icons.is_empty() {
            return Err("icons must not be empty".to_string());
        }
        for (i, icon) in self.icons.iter().enumerate() {
            if icon.size == 0 {
                return Err(format!("icon '{}' must have a non-zero size", icon.key));
            }
            if self.icons[..i].iter().any(|other| other.key == icon.key) {
                return Err(format!("icon key '{}' is defined twice", icon.key));
            }
        }
        if self.icon(&self.default_icon).is_none() {
            return Err(format!(
                "default_icon '{}' is not a configured icon",
                self.default_icon
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.has_radar("VH"));
        assert!(catalog.has_radar("VV"));
        assert!(!catalog.has_radar("HH"));
        assert_eq!(
            catalog.icon_keys().collect::<Vec<_>>(),
            vec!["blue", "green", "grey"]
        );
        assert!(catalog.check().is_ok());
    }

    #[test]
    fn test_icon_lookup() {
        let catalog = Catalog::default();
        let green = catalog.icon("green").unwrap();
        assert_eq!(green.size, 30);
        assert_eq!(green.description, "OpenStreetMap data");
        assert!(catalog.icon("purple").is_none());
    }

    #[test]
    fn test_icon_path() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.icon_path("blue").as_deref(),
            Some("assets/icons/blue_house.png")
        );
        assert!(catalog.icon_path("purple").is_none());
    }

    #[test]
    fn test_icon_path_trailing_slash() {
        let catalog = Catalog {
            icons_dir: "static/icons/".to_string(),
            ..Catalog::default()
        };
        assert_eq!(
            catalog.icon_path("grey").as_deref(),
            Some("static/icons/grey_house.png")
        );
    }

    #[test]
    fn test_check_rejects_unknown_default_radar() {
        let catalog = Catalog {
            default_radar: "HH".to_string(),
            ..Catalog::default()
        };
        assert!(catalog.check().unwrap_err().contains("default_radar"));
    }

    #[test]
    fn test_check_rejects_duplicate_icon() {
        let mut catalog = Catalog::default();
        catalog.icons.push(IconCategory::house("blue", 20, "Again"));
        assert!(catalog.check().unwrap_err().contains("defined twice"));
    }

    #[test]
    fn test_check_rejects_zero_size() {
        let mut catalog = Catalog::default();
        catalog.icons[1].size = 0;
        assert!(catalog.check().unwrap_err().contains("non-zero"));
    }

    #[test]
    fn test_check_rejects_empty_sets() {
        let catalog = Catalog {
            radar_types: Vec::new(),
            ..Catalog::default()
        };
        assert!(catalog.check().is_err());

        let catalog = Catalog {
            icons: Vec::new(),
            ..Catalog::default()
        };
        assert!(catalog.check().is_err());
    }

    #[test]
    fn test_catalog_deserialize_partial() {
        let json = r#"{"radar_types": ["HH", "HV"], "default_radar": "HH"}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert!(catalog.has_radar("HV"));
        assert_eq!(catalog.default_icon, "blue");
        assert!(catalog.check().is_ok());
    }
}
