//! Price data loading for the runner.
//!
//! Two file formats, chosen by extension:
//! - `.csv`: any header layout; columns are resolved by `RawFrame`
//! - `.json`: either an array of bar objects or a bare array of closes
//!
//! Loading only parses. Resolving the table into a series happens at
//! analysis time so that an unresolvable table still produces a (neutral)
//! report.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use protrader_core::data::RawFrame;
use protrader_core::domain::PriceSeries;
use protrader_core::error::EngineError;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported input '{0}' (expected a .csv or .json file)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parsed input, not yet resolved into a series.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedInput {
    Table(RawFrame),
    Series(PriceSeries),
}

impl LoadedInput {
    /// Rows in the source, whether or not they resolve.
    pub fn len(&self) -> usize {
        match self {
            LoadedInput::Table(raw) => raw.len(),
            LoadedInput::Series(series) => series.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The series to analyze, cut to the most recent `max_bars` when set.
    pub fn resolve(&self, max_bars: Option<usize>) -> Result<PriceSeries, EngineError> {
        let series = match self {
            LoadedInput::Table(raw) => raw.to_series()?,
            LoadedInput::Series(series) => series.clone(),
        };
        Ok(match max_bars {
            Some(n) => series.tail(n),
            None => series,
        })
    }
}

pub fn load_input(path: &Path) -> Result<LoadedInput, LoadError> {
    let format = InputFormat::from_path(path)?;
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let input = match format {
        InputFormat::Csv => LoadedInput::Table(read_csv(reader)?),
        InputFormat::Json => LoadedInput::Series(read_json(reader)?),
    };
    info!(path = %path.display(), rows = input.len(), "loaded price data");
    Ok(input)
}

/// Read a headed CSV table. Cells are trimmed; ragged rows are an error.
pub fn read_csv<R: Read>(reader: R) -> Result<RawFrame, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
    let mut frame = RawFrame::new(headers, Vec::new())?;
    for record in rdr.records() {
        let record = record?;
        frame.push_row(record.iter().map(String::from).collect())?;
    }
    Ok(frame)
}

/// Read bars from JSON: an array of bar objects, or an array of closes
/// placed on the synthetic clock.
pub fn read_json<R: Read>(reader: R) -> Result<PriceSeries, LoadError> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    let closes: Option<Vec<f64>> = value
        .as_array()
        .and_then(|items| items.iter().map(|v| v.as_f64()).collect());
    match closes {
        Some(closes) => Ok(PriceSeries::from_closes(&closes)?),
        None => Ok(serde_json::from_value(value)?),
    }
}
