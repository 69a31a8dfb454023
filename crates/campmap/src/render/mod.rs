//! Interactive map generation.
//!
//! [`MapRenderer`] turns the camps held by a [`CampManager`] into a single
//! Leaflet page: one marker per camp with a popup, two image modals per camp,
//! a legend and an optional statistics panel.
//!
//! Asset links are relative. With the default configuration the page is
//! written to `output/` and reaches the assets through `../assets/`.

mod html;
mod page;

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::camp::Camp;
use crate::catalog::{Catalog, IconCategory};
use crate::config::{create_dir, MapConfig, MAX_ZOOM};
use crate::error::{Error, Result};
use crate::manager::CampManager;

pub use html::{escape, script_json};

/// Title of generated pages.
pub const PAGE_TITLE: &str = "Refugee camp map";

/// Preview animation shown in the popup and its modal.
#[must_use]
pub fn preview_path(name: &str) -> String {
    format!("assets/img_TIF/{name}.gif")
}

/// Monthly radar collection offered for download.
#[must_use]
pub fn download_path(name: &str, radar: &str) -> String {
    format!("assets/TIF/FBRcollectionMonthly{radar}_{name}.tif")
}

/// Analysis results image shown in the results modal.
#[must_use]
pub fn results_path(name: &str) -> String {
    format!("assets/results/{name}_results.png")
}

/// Percent-encode `text` as a single URL path segment.
fn encode_segment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// Asset links for one camp, relative to the project root.
///
/// The name and radar segments are percent-encoded, so the links resolve to
/// the files named by [`preview_path`], [`download_path`] and
/// [`results_path`] whatever characters the camp name holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampAssets {
    /// Preview GIF.
    pub preview: String,
    /// Downloadable GeoTIFF.
    pub download: String,
    /// Results image.
    pub results: String,
}

impl CampAssets {
    /// Derive the asset links from the camp name and radar.
    #[must_use]
    pub fn for_camp(camp: &Camp) -> Self {
        let name = encode_segment(camp.name());
        let radar = encode_segment(camp.radar());
        Self {
            preview: preview_path(&name),
            download: download_path(&name, &radar),
            results: results_path(&name),
        }
    }
}

/// Per-render overrides of the configured view.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Initial `[latitude, longitude]`; the configured centre if `None`.
    pub center: Option<[f64; 2]>,
    /// Initial zoom; the configured zoom if `None`.
    pub zoom: Option<u8>,
    /// Only render camps with this icon category.
    pub icon_filter: Option<String>,
    /// Include the statistics panel.
    pub statistics: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            center: None,
            zoom: None,
            icon_filter: None,
            statistics: true,
        }
    }
}

/// Marker data handed to the page script.
#[derive(Debug, Serialize)]
struct Marker {
    lat: f64,
    lon: f64,
    icon: String,
    size: u32,
    tooltip: String,
    popup: String,
}

/// Renders camps to a standalone HTML page.
#[derive(Debug, Clone, Copy)]
pub struct MapRenderer<'a> {
    map: &'a MapConfig,
    catalog: &'a Catalog,
}

impl<'a> MapRenderer<'a> {
    /// Create a renderer for the given map settings and catalog.
    #[must_use]
    pub fn new(map: &'a MapConfig, catalog: &'a Catalog) -> Self {
        Self { map, catalog }
    }

    /// Camps selected by `options`, in collection order.
    #[must_use]
    pub fn select<'m>(&self, manager: &'m CampManager, options: &RenderOptions) -> Vec<&'m Camp> {
        match options.icon_filter.as_deref() {
            Some(key) => manager.by_icon_type(key),
            None => manager.camps().iter().collect(),
        }
    }

    /// Per-category counts for the statistics panel.
    ///
    /// Only categories with at least one selected camp are returned.
    #[must_use]
    pub fn statistics(
        &self,
        manager: &CampManager,
        options: &RenderOptions,
    ) -> Vec<(&'a IconCategory, usize)> {
        let filter = options.icon_filter.as_deref();
        self.catalog
            .icons
            .iter()
            .filter(|icon| filter.map_or(true, |key| key == icon.key))
            .map(|icon| (icon, manager.by_icon_type(&icon.key).len()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Render the page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingToRender`] if no camp is selected,
    /// [`Error::Validation`] for an out-of-range view or a camp whose icon is
    /// not in the catalog, and [`Error::Json`] if the marker data cannot be
    /// serialized.
    pub fn render(&self, manager: &CampManager, options: &RenderOptions) -> Result<String> {
        let camps = self.select(manager, options);
        if camps.is_empty() {
            return Err(Error::NothingToRender {
                filter: options.icon_filter.clone(),
            });
        }

        let center = options.center.unwrap_or(self.map.center);
        if !center.iter().all(|c| c.is_finite()) {
            return Err(Error::validation(format!(
                "map center {center:?} is not a coordinate"
            )));
        }
        let zoom = options.zoom.unwrap_or(self.map.zoom);
        if zoom > MAX_ZOOM {
            return Err(Error::validation(format!(
                "map zoom ({zoom}) cannot exceed {MAX_ZOOM}"
            )));
        }

        let prefix = self.map.asset_prefix.as_str();
        let style = &self.map.style;
        let mut markers = Vec::with_capacity(camps.len());
        let mut modals = String::new();

        for (index, camp) in camps.iter().enumerate() {
            let icon = self.catalog.icon(camp.icon_type()).ok_or_else(|| {
                Error::validation(format!("invalid icon type: {}", camp.icon_type()))
            })?;
            let icon_path = self.catalog.icon_path(&icon.key).unwrap_or_default();
            let assets = CampAssets::for_camp(camp);

            markers.push(Marker {
                lat: camp.latitude(),
                lon: camp.longitude(),
                icon: format!("{prefix}{icon_path}"),
                size: icon.size,
                tooltip: format!("<b>{}</b>", escape(camp.name())),
                popup: html::popup(camp, index, &assets, prefix, style),
            });
            modals.push_str(&html::modals(camp, index, &assets, prefix));
        }

        let legend = html::legend(self.catalog, &self.map.sources, prefix, style);
        let stats = if options.statistics {
            html::statistics(camps.len(), &self.statistics(manager, options), style)
        } else {
            String::new()
        };

        let markers = script_json(&markers)?;
        let tile_url = script_json(&self.map.tile_url)?;
        let tile_attribution = script_json(&self.map.tile_attribution)?;
        let center_lat = center[0].to_string();
        let center_lon = center[1].to_string();
        let zoom = zoom.to_string();
        let popup_max_width = self.map.popup_max_width.to_string();
        let title = escape(PAGE_TITLE);

        debug!("Rendering {} markers", camps.len());
        Ok(page::fill(
            page::PAGE_TEMPLATE,
            &[
                ("TITLE", &title),
                ("MODALS", &modals),
                ("LEGEND", &legend),
                ("STATS", &stats),
                ("CENTER_LAT", &center_lat),
                ("CENTER_LON", &center_lon),
                ("ZOOM", &zoom),
                ("TILE_URL", &tile_url),
                ("TILE_ATTRIBUTION", &tile_attribution),
                ("MARKERS", &markers),
                ("POPUP_MAX_WIDTH", &popup_max_width),
            ],
        ))
    }

    /// Render the page and write it to `path`, returning the number of camps
    /// on the map.
    ///
    /// Missing parent directories are created and an existing file is
    /// replaced.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render); also returns [`Error::DirectoryCreate`]
    /// or [`Error::FileWrite`] on I/O failure.
    pub fn write(
        &self,
        manager: &CampManager,
        options: &RenderOptions,
        path: impl AsRef<Path>,
    ) -> Result<usize> {
        let path = path.as_ref();
        let page = self.render(manager, options)?;
        let count = self.select(manager, options).len();

        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }
        std::fs::write(path, page).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Map with {count} camps written to {}", path.display());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camp::CampDraft;
    use crate::config::Config;

    fn manager() -> CampManager {
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
            .add(CampDraft::new("Dadaab", 0.0553, 40.3086).icon_type("blue"))
            .unwrap();
        manager
    }

    fn render(manager: &CampManager, options: &RenderOptions) -> Result<String> {
        let config = Config::default();
        MapRenderer::new(&config.map, &config.catalog).render(manager, options)
    }

    #[test]
    fn test_asset_paths() {
        assert_eq!(preview_path("Kakuma"), "assets/img_TIF/Kakuma.gif");
        assert_eq!(
            download_path("Kakuma", "VV"),
            "assets/TIF/FBRcollectionMonthlyVV_Kakuma.tif"
        );
        assert_eq!(results_path("Kakuma"), "assets/results/Kakuma_results.png");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("Kakuma_2-a.b~"), "Kakuma_2-a.b~");
        assert_eq!(encode_segment("Camp #1?%"), "Camp%20%231%3F%25");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
        assert_eq!(encode_segment("Zaātarī"), "Za%C4%81tar%C4%AB");
    }

    #[test]
    fn test_camp_assets_are_percent_encoded() {
        let camp = Camp::new(
            CampDraft::new("Camp #1?%", 1.0, 2.0).radar("VV"),
            &Config::default().catalog,
        )
        .unwrap();
        let assets = CampAssets::for_camp(&camp);

        assert_eq!(assets.preview, "assets/img_TIF/Camp%20%231%3F%25.gif");
        assert_eq!(
            assets.download,
            "assets/TIF/FBRcollectionMonthlyVV_Camp%20%231%3F%25.tif"
        );
        assert_eq!(assets.results, "assets/results/Camp%20%231%3F%25_results.png");
    }

    #[test]
    fn test_render_links_survive_special_names() {
        let mut manager = CampManager::default();
        manager.add(CampDraft::new("Camp #1?%", 1.0, 2.0)).unwrap();
        let page = render(&manager, &RenderOptions::default()).unwrap();

        assert!(page.contains("src=\"../assets/img_TIF/Camp%20%231%3F%25.gif\""));
        assert!(page.contains("../assets/results/Camp%20%231%3F%25_results.png"));
        assert!(!page.contains("img_TIF/Camp #1"));
    }

    #[test]
    fn test_render_default_view() {
        let page = render(&manager(), &RenderOptions::default()).unwrap();

        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("setView([0, 20], 4)"));
        assert!(page.contains("\"https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png\""));
        assert!(page.contains("maxWidth: 250"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_render_one_marker_and_two_modals_per_camp() {
        let page = render(&manager(), &RenderOptions::default()).unwrap();

        assert_eq!(page.matches("\"tooltip\":").count(), 3);
        for i in 0..3 {
            assert!(page.contains(&format!("id=\"modal_{i}\"")));
            assert!(page.contains(&format!("id=\"modal_{i}_results\"")));
        }
        assert!(page.contains("../assets/icons/green_house.png"));
        assert!(page.contains("\"size\":30"));
    }

    #[test]
    fn test_render_statistics_panel() {
        let page = render(&manager(), &RenderOptions::default()).unwrap();
        assert!(page.contains("Total camps: <strong>3</strong>"));
        assert!(page.contains("Site mapping data: <strong>2</strong>"));
        assert!(page.contains("OpenStreetMap data: <strong>1</strong>"));
        assert!(!page.contains("No data: <strong>"));

        let options = RenderOptions {
            statistics: false,
            ..RenderOptions::default()
        };
        let page = render(&manager(), &options).unwrap();
        assert!(!page.contains("Total camps"));
    }

    #[test]
    fn test_render_custom_view() {
        let options = RenderOptions {
            center: Some([3.5, 32.0]),
            zoom: Some(7),
            icon_filter: Some("blue".to_string()),
            statistics: true,
        };
        let page = render(&manager(), &options).unwrap();

        assert!(page.contains("setView([3.5, 32], 7)"));
        assert_eq!(page.matches("\"tooltip\":").count(), 2);
        assert!(!page.contains("Bidi Bidi"));
        assert!(page.contains("Total camps: <strong>2</strong>"));
    }

    #[test]
    fn test_render_empty_collection() {
        let err = render(&CampManager::default(), &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NothingToRender { filter: None }));
    }

    #[test]
    fn test_render_filter_without_matches() {
        let options = RenderOptions {
            icon_filter: Some("grey".to_string()),
            ..RenderOptions::default()
        };
        let err = render(&manager(), &options).unwrap_err();
        assert_eq!(err.to_string(), "no camps to render for filter 'grey'");
    }

    #[test]
    fn test_render_rejects_bad_zoom() {
        let options = RenderOptions {
            zoom: Some(30),
            ..RenderOptions::default()
        };
        assert!(render(&manager(), &options).unwrap_err().is_validation());
    }

    #[test]
    fn test_render_escapes_camp_names() {
        let mut manager = CampManager::default();
        manager
            .add(CampDraft::new("</script><b>x</b>", 1.0, 2.0))
            .unwrap();
        let page = render(&manager, &RenderOptions::default()).unwrap();

        assert_eq!(page.matches("</script>").count(), 2);
        assert!(!page.contains("<b>x</b>"));
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output/map.html");
        let config = Config::default();
        let renderer = MapRenderer::new(&config.map, &config.catalog);

        let count = renderer
            .write(&manager(), &RenderOptions::default(), &path)
            .unwrap();

        assert_eq!(count, 3);
        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.contains("Kakuma"));
    }

    #[test]
    fn test_write_empty_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        let config = Config::default();
        let renderer = MapRenderer::new(&config.map, &config.catalog);

        assert!(renderer
            .write(&CampManager::default(), &RenderOptions::default(), &path)
            .is_err());
        assert!(!path.exists());
    }
}
