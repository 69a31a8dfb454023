//! CSV bulk import and template export.
//!
//! Unlike snapshot loading, CSV import is row-tolerant: bad rows are logged and
//! skipped so one typo in a hand-edited sheet does not block the rest.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::{debug, info, warn};

use super::CampManager;
use crate::camp::CampDraft;
use crate::config::create_dir;
use crate::error::{Error, Result};

/// Column names of the import format, in template order.
pub const CSV_HEADERS: [&str; 6] = [
    "name",
    "latitude",
    "longitude",
    "population",
    "radar",
    "icon_type",
];

/// Example rows written by the template export.
pub const TEMPLATE_ROWS: [[&str; 6]; 3] = [
    ["Exemple_Camp_1", "10.123456", "20.654321", "50000", "VH", "blue"],
    ["Exemple_Camp_2", "15.987654", "25.123456", "N/A", "VV", "green"],
    ["Exemple_Camp_3", "5.555555", "15.111111", "25000", "VH", "grey"],
];

const REQUIRED_COLUMNS: [&str; 3] = ["name", "latitude", "longitude"];

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvImportReport {
    /// Data rows read.
    pub rows: usize,
    /// Camps added.
    pub added: usize,
    /// Rows without a name, skipped silently.
    pub blank: usize,
    /// Rows skipped because of a parse or validation error.
    pub failed: usize,
}

/// Column name to field index.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let map: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').to_string(), i))
            .collect();

        if let Some(&column) = REQUIRED_COLUMNS.iter().find(|c| !map.contains_key(**c)) {
            return Err(Error::MissingColumn { column });
        }
        Ok(Self(map))
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.0.get(column).and_then(|&i| record.get(i))
    }

    /// Non-empty optional field.
    fn optional(&self, record: &StringRecord, column: &str) -> Option<String> {
        self.get(record, column)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

fn parse_coordinate(columns: &Columns, record: &StringRecord, column: &str) -> Result<f64> {
    let raw = columns.get(record, column).unwrap_or_default();
    raw.parse::<f64>()
        .map_err(|_| Error::validation(format!("{column} '{raw}' is not a number")))
}

impl CampManager {
    /// Add camps from a CSV file with a header row.
    ///
    /// The header must contain `name`, `latitude` and `longitude`;
    /// `population`, `radar` and `icon_type` are optional and empty cells fall
    /// back to the defaults. Rows without a name are skipped silently. Rows that
    /// cannot be parsed, have non-numeric coordinates, or are rejected by
    /// [`add`](Self::add) are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the file does not exist,
    /// [`Error::FileRead`] or [`Error::Csv`] if it cannot be read, and
    /// [`Error::MissingColumn`] if a required column is absent. Row errors are
    /// never returned.
    pub fn load_csv(&mut self, path: impl AsRef<Path>) -> Result<CsvImportReport> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
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

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(BufReader::new(file));

        let columns = Columns::from_headers(reader.headers()?)?;
        let mut report = CsvImportReport::default();

        for result in reader.records() {
            report.rows += 1;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable CSV row: {}", e);
                    report.failed += 1;
                    continue;
                }
            };
            let line = record.position().map_or(0, csv::Position::line);

            let name = columns.get(&record, "name").unwrap_or_default();
            if name.is_empty() {
                debug!("Skipping line {} without a name", line);
                report.blank += 1;
                continue;
            }

            match self.add_csv_row(&columns, &record, name) {
                Ok(()) => report.added += 1,
                Err(e) => {
                    warn!("Skipping line {} ({}): {}", line, name, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "Added {} camps from {} ({} rows, {} failed)",
            report.added,
            path.display(),
            report.rows,
            report.failed
        );
        Ok(report)
    }

    fn add_csv_row(&mut self, columns: &Columns, record: &StringRecord, name: &str) -> Result<()> {
        let latitude = parse_coordinate(columns, record, "latitude")?;
        let longitude = parse_coordinate(columns, record, "longitude")?;

        let draft = CampDraft {
            name: name.to_string(),
            latitude,
            longitude,
            population: columns.optional(record, "population"),
            radar: columns.optional(record, "radar"),
            icon_type: columns.optional(record, "icon_type"),
        };
        self.add(draft).map(|_| ())
    }

    /// Write the CSV template to the default template path and return it.
    ///
    /// # Errors
    ///
    /// See [`export_csv_template_to`](Self::export_csv_template_to).
    pub fn export_csv_template(&self) -> Result<PathBuf> {
        let path = self.template_path.clone();
        export_template(&path)?;
        Ok(path)
    }

    /// Write the header row and three example rows to `path`, replacing any
    /// existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryCreate`], [`Error::FileWrite`] or
    /// [`Error::Csv`] if the file cannot be written.
    pub fn export_csv_template_to(&self, path: impl AsRef<Path>) -> Result<()> {
        export_template(path.as_ref())
    }
}

fn export_template(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }

    let file = File::create(path).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = WriterBuilder::new().from_writer(file);
    writer.write_record(CSV_HEADERS)?;
    for row in TEMPLATE_ROWS {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!("CSV template written to {}", path.display());
    Ok(())
}
