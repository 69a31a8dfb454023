//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::camp::{CampDraft, CampUpdate};
use crate::config::MAX_ZOOM;
use crate::render::RenderOptions;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Camp name (must be unique)
    #[arg(short, long)]
    pub name: String,

    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Population, or N/A if unknown
    #[arg(short, long)]
    pub pop: Option<String>,

    /// Radar polarisation (e.g. VH, VV)
    #[arg(short, long)]
    pub radar: Option<String>,

    /// Icon category (e.g. blue, green, grey)
    #[arg(short, long)]
    pub icon: Option<String>,
}

impl AddCommand {
    /// Build the draft this command describes.
    #[must_use]
    pub fn to_draft(&self) -> CampDraft {
        let mut draft = CampDraft::new(&self.name, self.lat, self.lon);
        draft.population.clone_from(&self.pop);
        draft.radar.clone_from(&self.radar);
        draft.icon_type.clone_from(&self.icon);
        draft
    }
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// CSV file with a name,latitude,longitude,population,radar,icon_type header
    pub file: PathBuf,
}

/// Template command arguments.
#[derive(Debug, Args)]
pub struct TemplateCommand {
    /// Where to write the template (defaults to the configured template path)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Exact camp name
    pub name: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Update command arguments.
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Exact name of the camp to change
    pub name: String,

    /// New name
    #[arg(long)]
    pub rename: Option<String>,

    /// New latitude
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// New longitude
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// New population
    #[arg(short, long)]
    pub pop: Option<String>,

    /// New radar polarisation
    #[arg(short, long)]
    pub radar: Option<String>,

    /// New icon category
    #[arg(short, long)]
    pub icon: Option<String>,
}

impl UpdateCommand {
    /// Build the changeset this command describes.
    #[must_use]
    pub fn to_update(&self) -> CampUpdate {
        CampUpdate {
            name: self.rename.clone(),
            latitude: self.lat,
            longitude: self.lon,
            population: self.pop.clone(),
            radar: self.radar.clone(),
            icon_type: self.icon.clone(),
        }
    }
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Exact name of the camp to remove
    pub name: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Render command arguments.
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Where to write the map (defaults to the configured output path)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Leave out the statistics panel
    #[arg(long)]
    pub no_stats: bool,

    /// Initial view centre as LAT,LON
    #[arg(long, value_name = "LAT,LON", value_parser = parse_center, allow_hyphen_values = true)]
    pub center: Option<[f64; 2]>,

    /// Initial zoom level
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_ZOOM)))]
    pub zoom: Option<u8>,

    /// Only show camps with this icon category
    #[arg(short, long)]
    pub icon: Option<String>,
}

impl RenderCommand {
    /// Build the render options this command describes.
    #[must_use]
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            center: self.center,
            zoom: self.zoom,
            icon_filter: self.icon.clone(),
            statistics: !self.no_stats,
        }
    }
}

/// Parse a `LAT,LON` pair.
fn parse_center(value: &str) -> Result<[f64; 2], String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("'{}' is not a number", part.trim()))
    };
    Ok([parse(lat)?, parse(lon)?])
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
