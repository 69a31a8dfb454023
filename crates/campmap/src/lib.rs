//! `campmap` - A catalog of refugee camps and the interactive map built from it
//!
//! This library keeps an ordered, name-unique collection of camp records,
//! persists it as a JSON snapshot, bulk-imports it from CSV and renders it as a
//! self-contained Leaflet page.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod camp;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod render;

pub use camp::{Camp, CampDraft, CampRecord, CampUpdate};
pub use catalog::{Catalog, IconCategory};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use manager::{CampManager, CsvImportReport};
pub use render::{MapRenderer, RenderOptions};
