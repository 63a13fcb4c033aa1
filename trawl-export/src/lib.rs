//! Flat tabular export of an [`ExtractionBatch`].
//!
//! One header row ([`ReviewRecord::COLUMNS`]) followed by one row per record,
//! missing fields written as `N/A`. Without an explicit path the file is named
//! after the current local time, e.g. `20240131_1542_reviews_data.csv`.

pub mod table;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::info;
use trawl_core::{ExtractionBatch, ReviewRecord};

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Csv,
    Tsv,
}

impl TableFormat {
    pub fn separator(self) -> char {
        match self {
            TableFormat::Csv => ',',
            TableFormat::Tsv => '\t',
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Tsv => "tsv",
        }
    }
}

/// `{%Y%m%d_%H%M}_reviews_data.<ext>` for the given instant.
pub fn default_filename<Tz: TimeZone>(now: &DateTime<Tz>, format: TableFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_reviews_data.{}",
        now.format("%Y%m%d_%H%M"),
        format.extension()
    )
}

/// The path actually written: the requested one with the extension appended
/// when it does not already end with it, or the timestamped default.
pub fn resolve_path(requested: Option<&Path>, format: TableFormat) -> PathBuf {
    let ext = format.extension();
    match requested {
        Some(path) => {
            let suffix = format!(".{ext}");
            if path.to_string_lossy().ends_with(&suffix) {
                path.to_path_buf()
            } else {
                let mut name = path.as_os_str().to_owned();
                name.push(suffix);
                PathBuf::from(name)
            }
        }
        None => PathBuf::from(default_filename(&Local::now(), format)),
    }
}

/// Render the batch to a string; handy for stdout and tests.
pub fn render_batch(batch: &ExtractionBatch, format: TableFormat) -> io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    table::write_table(
        &mut buf,
        &ReviewRecord::COLUMNS,
        batch.iter().map(ReviewRecord::to_row),
        format.separator(),
    )?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write `batch` to disk and return the path written.
pub fn export_batch(
    batch: &ExtractionBatch,
    requested: Option<&Path>,
    format: TableFormat,
) -> Result<PathBuf, ExportError> {
    let path = resolve_path(requested, format);

    let file = File::create(&path).map_err(|source| ExportError::Create {
        path: path.clone(),
        source,
    })?;
    table::write_table(
        BufWriter::new(file),
        &ReviewRecord::COLUMNS,
        batch.iter().map(ReviewRecord::to_row),
        format.separator(),
    )
    .map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    info!(target: "trawl.export", path = %path.display(), rows = batch.len(), "wrote reviews table");
    Ok(path)
}
