//! Configuration management for campmap.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the user config dir.
const APP_DIR_NAME: &str = "campmap";

/// Sub-directories of the assets directory the map links into.
pub const ASSET_SUBDIRS: &[&str] = &["icons", "img_TIF", "TIF", "results"];

/// Highest zoom level OpenStreetMap tiles are served at.
pub const MAX_ZOOM: u8 = 19;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CAMPMAP_`, nested with `__`)
/// 2. TOML config file at `~/.config/campmap/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Accepted radar codes and icon categories.
    pub catalog: Catalog,
    /// Map rendering configuration.
    pub map: MapConfig,
}

/// Where snapshots, templates, assets and generated maps live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot and CSV template.
    pub data_dir: PathBuf,
    /// Snapshot file name inside `data_dir`.
    pub snapshot_file: String,
    /// CSV template file name inside `data_dir`.
    pub template_file: String,
    /// Directory holding icons, previews and imagery.
    pub assets_dir: PathBuf,
    /// Directory generated maps are written to.
    pub output_dir: PathBuf,
}

/// Map rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial `[latitude, longitude]` of the view.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Maximum popup width in pixels.
    pub popup_max_width: u32,
    /// Generated map file name inside `storage.output_dir`.
    pub output_file: String,
    /// Prefix prepended to asset paths so they resolve from the output file.
    pub asset_prefix: String,
    /// Tile URL template.
    pub tile_url: String,
    /// Tile attribution HTML.
    pub tile_attribution: String,
    /// Data sources credited in the legend.
    pub sources: Vec<DataSource>,
    /// Popup and legend styling.
    pub style: StyleConfig,
}

/// A credited data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    /// Link text.
    pub label: String,
    /// Link target.
    pub url: String,
}

/// CSS values for popups and the legend panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Popup font family.
    pub font_family: String,
    /// Popup text alignment.
    pub text_align: String,
    /// Popup padding.
    pub padding: String,
    /// Popup title colour.
    pub title_color: String,
    /// Popup body colour.
    pub text_color: String,
    /// Popup and legend font size.
    pub font_size: String,
    /// Legend distance from the bottom edge.
    pub legend_bottom: String,
    /// Legend distance from the left edge.
    pub legend_left: String,
    /// Legend width.
    pub legend_width: String,
    /// Legend height.
    pub legend_height: String,
    /// Legend background colour.
    pub legend_background: String,
    /// Legend border.
    pub legend_border: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            snapshot_file: "camps.json".to_string(),
            template_file: "camps_template.csv".to_string(),
            assets_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Centred on Africa
            center: [0.0, 20.0],
            zoom: 4,
            popup_max_width: 250,
            output_file: "camp_map.html".to_string(),
            asset_prefix: "../".to_string(),
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution:
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                    .to_string(),
            sources: default_sources(),
            style: StyleConfig::default(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            text_align: "left".to_string(),
            padding: "10px".to_string(),
            title_color: "#2C3E50".to_string(),
            text_color: "#2C3E50".to_string(),
            font_size: "14px".to_string(),
            legend_bottom: "10px".to_string(),
            legend_left: "10px".to_string(),
            legend_width: "250px".to_string(),
            legend_height: "200px".to_string(),
            legend_background: "white".to_string(),
            legend_border: "2px solid grey".to_string(),
        }
    }
}

/// Default data sources credited in the legend.
fn default_sources() -> Vec<DataSource> {
    vec![
        DataSource {
            label: "UNHCR".to_string(),
            url: "https://im.unhcr.org/apps/sitemapping/#/".to_string(),
        },
        DataSource {
            label: "Copernicus".to_string(),
            url: "https://browser.dataspace.copernicus.eu/".to_string(),
        },
    ]
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        debug!("Loading configuration from {}", config_file.display());

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("CAMPMAP_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.catalog
            .check()
            .map_err(|message| Error::ConfigValidation { message })?;

        if !self.map.center.iter().all(|c| c.is_finite()) {
            return Err(Error::ConfigValidation {
                message: format!("map center {:?} is not a coordinate", self.map.center),
            });
        }

        if self.map.zoom > MAX_ZOOM {
            return Err(Error::ConfigValidation {
                message: format!("map zoom ({}) cannot exceed {MAX_ZOOM}", self.map.zoom),
            });
        }

        if self.map.popup_max_width == 0 {
            return Err(Error::ConfigValidation {
                message: "popup_max_width must be greater than 0".to_string(),
            });
        }

        if self.storage.snapshot_file.is_empty() || self.map.output_file.is_empty() {
            return Err(Error::ConfigValidation {
                message: "snapshot_file and output_file must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Path of the JSON snapshot.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.snapshot_file)
    }

    /// Path of the CSV template.
    #[must_use]
    pub fn template_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.template_file)
    }

    /// Path of the generated map.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.storage.output_dir.join(&self.map.output_file)
    }

    /// Create the data, assets and output directories if they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryCreate`] naming the first directory that could
    /// not be created.
    pub fn ensure_directories(&self) -> Result<()> {
        let storage = &self.storage;
        let assets = ASSET_SUBDIRS.iter().map(|sub| storage.assets_dir.join(sub));
        let dirs = [
            storage.data_dir.clone(),
            storage.assets_dir.clone(),
            storage.output_dir.clone(),
        ]
        .into_iter()
        .chain(assets);

        for dir in dirs {
            create_dir(&dir)?;
        }
        Ok(())
    }
}

/// Create `dir` and its parents, mapping failures to [`Error::DirectoryCreate`].
pub(crate) fn create_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }
    debug!("Creating directory {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })
}
