//! RawFrame — untyped tabular price data as delivered by a file or a feed.
//!
//! Column names are matched case-insensitively. Resolution into a
//! `PriceSeries`:
//! - close: first column whose name contains `close`; otherwise the last
//!   column (other than the timestamp) whose non-empty cells all parse as
//!   numbers; otherwise `MissingData`
//! - open/high/low: columns named exactly so, falling back to close per cell
//! - volume: first column with a name word equal to `vol` or starting with
//!   `volume` (`Volume`, `tick_volume`, but not `volatility`); unparseable
//!   cells are treated as absent
//! - timestamp: a `time`, `timestamp`, `date` or `datetime` column; without
//!   one the bars go on the synthetic one-minute clock

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{synthetic_timestamp, Bar, PriceSeries};
use crate::error::EngineError;

use super::timestamp::parse_timestamp;

const TIMESTAMP_COLUMNS: &[&str] = &["time", "timestamp", "date", "datetime"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFrame {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawFrame {
    /// Every row must have exactly one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, EngineError> {
        let mut frame = Self {
            headers,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), EngineError> {
        if row.len() != self.headers.len() {
            return Err(EngineError::MissingData(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column the close price is read from.
    pub fn close_column(&self) -> Result<usize, EngineError> {
        if let Some(i) = self.find(|name| name.contains("close")) {
            return Ok(i);
        }
        let ts = self.timestamp_column();
        (0..self.headers.len())
            .rev()
            .find(|&i| Some(i) != ts && self.is_numeric(i))
            .ok_or_else(|| {
                EngineError::MissingData(format!(
                    "no close column and no numeric column in [{}]",
                    self.headers.join(", ")
                ))
            })
    }

    pub fn timestamp_column(&self) -> Option<usize> {
        self.find(|name| TIMESTAMP_COLUMNS.contains(&name))
    }

    pub fn to_series(&self) -> Result<PriceSeries, EngineError> {
        if self.rows.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        let close_col = self.close_column()?;
        let ts_col = self.timestamp_column();
        let open_col = self.find(|name| name == "open");
        let high_col = self.find(|name| name == "high");
        let low_col = self.find(|name| name == "low");
        let volume_col = self.find(is_volume_name);

        debug!(
            close = %self.headers[close_col],
            timestamp = ts_col.map(|i| self.headers[i].as_str()).unwrap_or("<synthetic>"),
            rows = self.rows.len(),
            "resolving raw frame"
        );

        let mut bars = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let close = number(&row[close_col]).ok_or_else(|| {
                EngineError::MissingData(format!(
                    "row {i}: close '{}' is not a number",
                    row[close_col]
                ))
            })?;
            let timestamp = match ts_col {
                Some(c) => parse_timestamp(&row[c]).ok_or_else(|| {
                    EngineError::MissingData(format!(
                        "row {i}: unparseable timestamp '{}'",
                        row[c]
                    ))
                })?,
                None => synthetic_timestamp(i),
            };
            let or_close = |col: Option<usize>| col.and_then(|c| number(&row[c])).unwrap_or(close);
            bars.push(Bar {
                timestamp,
                open: or_close(open_col),
                high: or_close(high_col),
                low: or_close(low_col),
                close,
                volume: volume_col.and_then(|c| number(&row[c])),
            });
        }
        PriceSeries::new(bars)
    }

    fn find(&self, pred: impl Fn(&str) -> bool) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| pred(h.trim().to_lowercase().as_str()))
    }

    /// At least one non-empty cell, and every non-empty cell is a number.
    fn is_numeric(&self, col: usize) -> bool {
        let mut seen = false;
        for row in &self.rows {
            let cell = row[col].trim();
            if cell.is_empty() {
                continue;
            }
            if cell.parse::<f64>().is_err() {
                return false;
            }
            seen = true;
        }
        seen
    }
}

fn is_volume_name(name: &str) -> bool {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word == "vol" || word.starts_with("volume"))
}

fn number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
