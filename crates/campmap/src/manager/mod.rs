//! In-memory camp collection for campmap.
//!
//! [`CampManager`] owns the ordered list of camps for one invocation and is the
//! only way to change it. Persistence lives in the `snapshot` (JSON) and
//! `csv_io` (bulk import, template export) submodules.

mod csv_io;
mod snapshot;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::camp::{Camp, CampDraft, CampUpdate};
use crate::catalog::{Catalog, IconCategory};
use crate::config::Config;
use crate::error::{Error, Result};

pub use csv_io::{CsvImportReport, CSV_HEADERS, TEMPLATE_ROWS};
pub use snapshot::{Snapshot, SnapshotMetadata, SNAPSHOT_VERSION};

/// Text returned by [`CampManager::list`] when there are no camps.
pub const NO_CAMPS: &str = "No camps recorded";

/// Owner of the camp collection.
///
/// Camps keep insertion order and have unique, case-sensitive names. Callers
/// only ever get shared references or clones.
#[derive(Debug, Clone)]
pub struct CampManager {
    catalog: Catalog,
    camps: Vec<Camp>,
    snapshot_path: PathBuf,
    template_path: PathBuf,
}

impl CampManager {
    /// Create an empty manager using the default storage paths.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let config = Config {
            catalog,
            ..Config::default()
        };
        Self::from_config(&config)
    }

    /// Create an empty manager from the application configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            catalog: config.catalog.clone(),
            camps: Vec::new(),
            snapshot_path: config.snapshot_path(),
            template_path: config.template_path(),
        }
    }

    /// Replace the default snapshot path.
    #[must_use]
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// Replace the default CSV template path.
    #[must_use]
    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// The catalog camps are validated against.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Default snapshot location used by [`save`](Self::save) and [`load`](Self::load).
    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Default template location used by
    /// [`export_csv_template`](Self::export_csv_template).
    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// All camps in insertion order.
    #[must_use]
    pub fn camps(&self) -> &[Camp] {
        &self.camps
    }

    /// Add a new camp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateName`] if a camp with the same name exists, or
    /// [`Error::Validation`] if the draft is invalid. The collection is not
    /// changed in either case.
    pub fn add(&mut self, draft: CampDraft) -> Result<&Camp> {
        if self.find_by_name(&draft.name).is_some() {
            return Err(Error::duplicate_name(draft.name));
        }

        let camp = Camp::new(draft, &self.catalog)?;
        info!("Camp '{}' added", camp.name());
        self.camps.push(camp);
        Ok(&self.camps[self.camps.len() - 1])
    }

    /// Find a camp by exact name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Camp> {
        self.camps.iter().find(|camp| camp.name() == name)
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.camps
            .iter()
            .position(|camp| camp.name() == name)
            .ok_or_else(|| Error::not_found(name))
    }

    /// Apply `changes` to the named camp.
    ///
    /// The changes are validated on a copy and only committed if the result is
    /// valid, so a failed update leaves the camp as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no camp has this name,
    /// [`Error::DuplicateName`] if a rename collides with another camp, or
    /// [`Error::Validation`] if the changed camp is invalid.
    pub fn update(&mut self, name: &str, changes: &CampUpdate) -> Result<&Camp> {
        let index = self.position(name)?;

        if let Some(new_name) = changes.name.as_deref() {
            if new_name != name && self.find_by_name(new_name).is_some() {
                return Err(Error::duplicate_name(new_name));
            }
        }

        let next = self.camps[index].updated(changes, &self.catalog)?;
        info!("Camp '{}' updated", name);
        self.camps[index] = next;
        Ok(&self.camps[index])
    }

    /// Remove the named camp and return it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no camp has this name; nothing is removed.
    pub fn remove(&mut self, name: &str) -> Result<Camp> {
        let index = self.position(name)?;
        let camp = self.camps.remove(index);
        info!("Camp '{}' removed", name);
        Ok(camp)
    }

    /// Number of camps.
    #[must_use]
    pub fn count(&self) -> usize {
        self.camps.len()
    }

    /// Check whether there are no camps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.camps.is_empty()
    }

    /// Camps with the given icon category, in insertion order.
    #[must_use]
    pub fn by_icon_type(&self, icon_type: &str) -> Vec<&Camp> {
        self.camps
            .iter()
            .filter(|camp| camp.icon_type() == icon_type)
            .collect()
    }

    /// Number of camps per icon category, in catalog order.
    ///
    /// Categories without camps are included with a count of zero.
    #[must_use]
    pub fn icon_counts(&self) -> Vec<(&IconCategory, usize)> {
        self.catalog
            .icons
            .iter()
            .map(|icon| (icon, self.by_icon_type(&icon.key).len()))
            .collect()
    }

    /// Camp total followed by one line per icon category that has camps.
    #[must_use]
    pub fn stats(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total camps: {}", self.camps.len());
        for (icon, count) in self.icon_counts() {
            if count > 0 {
                let _ = writeln!(out, "  {:<24} {count}", format!("{}:", icon.description));
            }
        }
        out
    }

    /// Render the camps as a fixed-width table.
    ///
    /// Returns [`NO_CAMPS`] when the collection is empty.
    #[must_use]
    pub fn list(&self) -> String {
        if self.camps.is_empty() {
            return NO_CAMPS.to_string();
        }

        let rule = "-".repeat(80);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "{:<3} {:<20} {:<15} {:<6} {:<6} {:<20}",
            "#", "Name", "Population", "Radar", "Icon", "Coordinates"
        );
        let _ = writeln!(out, "{rule}");

        for (i, camp) in self.camps.iter().enumerate() {
            let coords = format!("{:.3}, {:.3}", camp.latitude(), camp.longitude());
            let _ = writeln!(
                out,
                "{:<3} {:<20} {:<15} {:<6} {:<6} {:<20}",
                i + 1,
                camp.name(),
                camp.population(),
                camp.radar(),
                camp.icon_type(),
                coords
            );
        }

        debug!("Listed {} camps", self.camps.len());
        out
    }

    /// Replace the whole collection.
    ///
    /// Names must be unique; on a duplicate the collection is left unchanged.
    fn replace_all(&mut self, camps: Vec<Camp>) -> Result<()> {
        for (i, camp) in camps.iter().enumerate() {
            if camps[..i].iter().any(|other| other.name() == camp.name()) {
                return Err(Error::duplicate_name(camp.name()));
            }
        }
        self.camps = camps;
        Ok(())
    }
}

impl Default for CampManager {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}
