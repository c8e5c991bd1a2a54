//! Split-orientation price table and OHLC column resolution.
//!
//! The price endpoint returns a pandas `to_dict(orient="split")` payload:
//! `{index: [...], columns: [...], data: [[...], ...]}`. Column names vary in
//! case between providers, so every lookup is case-insensitive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tabular price response as sent by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularResponse {
    /// Date labels, one per row. Absent or `null` is treated as empty.
    #[serde(default)]
    pub index: Option<Vec<String>>,

    #[serde(default)]
    pub columns: Vec<String>,

    /// Row-major values aligned to `columns`. `null` cells are gaps.
    #[serde(default)]
    pub data: Vec<Vec<Option<f64>>>,
}

/// Violation of the table's shape invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("malformed table: {rows} data rows for {labels} index labels")]
    RowCount { rows: usize, labels: usize },

    #[error("malformed table: row {row} has {len} values, expected {expected}")]
    RowWidth {
        row: usize,
        len: usize,
        expected: usize,
    },
}

impl TabularResponse {
    pub fn labels(&self) -> &[String] {
        self.index.as_deref().unwrap_or(&[])
    }

    /// True when there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.labels().len()
    }

    /// Check `data.len() == index.len()` and that every row is as wide as `columns`.
    pub fn validate_shape(&self) -> Result<(), ShapeError> {
        let labels = self.labels().len();
        if self.data.len() != labels {
            return Err(ShapeError::RowCount {
                rows: self.data.len(),
                labels,
            });
        }
        let expected = self.columns.len();
        for (row, values) in self.data.iter().enumerate() {
            if values.len() != expected {
                return Err(ShapeError::RowWidth {
                    row,
                    len: values.len(),
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Project one column out of the row-major data.
    ///
    /// Rows are assumed to be validated; a short row yields a gap.
    pub fn column(&self, col: usize) -> Vec<Option<f64>> {
        self.data
            .iter()
            .map(|row| row.get(col).copied().flatten())
            .collect()
    }
}

/// Position of the first column whose name equals `target`, ignoring case.
pub fn resolve_column(columns: &[String], target: &str) -> Option<usize> {
    let target = target.to_lowercase();
    columns.iter().position(|c| c.to_lowercase() == target)
}

/// Resolved positions of the OHLC(V) columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OhlcColumns {
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    pub volume: Option<usize>,
}

/// One or more of the mandatory OHLC columns is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required columns: {}", .missing.join(", "))]
pub struct MissingColumns {
    pub missing: Vec<&'static str>,
}

impl OhlcColumns {
    pub const OPEN: &'static str = "Open";
    pub const HIGH: &'static str = "High";
    pub const LOW: &'static str = "Low";
    pub const CLOSE: &'static str = "Close";
    pub const VOLUME: &'static str = "Volume";

    /// Resolve Open/High/Low/Close (mandatory) and Volume (optional).
    pub fn resolve(columns: &[String]) -> Result<Self, MissingColumns> {
        let open = resolve_column(columns, Self::OPEN);
        let high = resolve_column(columns, Self::HIGH);
        let low = resolve_column(columns, Self::LOW);
        let close = resolve_column(columns, Self::CLOSE);

        match (open, high, low, close) {
            (Some(open), Some(high), Some(low), Some(close)) => Ok(Self {
                open,
                high,
                low,
                close,
                volume: resolve_column(columns, Self::VOLUME),
            }),
            _ => {
                let missing = [
                    (Self::OPEN, open),
                    (Self::HIGH, high),
                    (Self::LOW, low),
                    (Self::CLOSE, close),
                ]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name)
                .collect();
                Err(MissingColumns { missing })
            }
        }
    }
}
