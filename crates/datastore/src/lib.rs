pub mod error;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use core_types::{PricePoint, PriceSeries, Symbol};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};

pub use error::{Error, Result};

/// One daily OHLCV bar as it appears on disk.
///
/// The column names mirror the provider's CSV convention (capitalized
/// headers with a `Date` index column).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
}

/// Flat-file store for daily bar histories, one CSV per symbol.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The on-disk path for a symbol's history.
    pub fn path_for(&self, symbol: &Symbol) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol.0))
    }

    /// Writes a symbol's full bar history, creating the data directory on
    /// first use and replacing any previous file.
    pub fn save_bars(&self, symbol: &Symbol, bars: &[BarRow]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.path_for(symbol);
        let mut writer = Writer::from_writer(File::create(&path)?);
        for bar in bars {
            writer.serialize(bar)?;
        }
        writer.flush()?;
        tracing::debug!(symbol = %symbol.0, rows = bars.len(), path = %path.display(), "Saved bar history.");
        Ok(())
    }

    /// Reads a symbol's full bar history.
    pub fn load_bars(&self, symbol: &Symbol) -> Result<Vec<BarRow>> {
        read_bars(&self.path_for(symbol))
    }

    /// Reads a symbol's history and narrows it to a validated close-price
    /// series, the input every downstream computation works from.
    pub fn load_series(&self, symbol: &Symbol) -> Result<PriceSeries> {
        let bars = self.load_bars(symbol)?;
        let points = bars
            .iter()
            .map(|bar| PricePoint {
                date: bar.date,
                close: bar.close,
            })
            .collect();
        Ok(PriceSeries::new(points)?)
    }
}

/// Reads daily bars from an arbitrary CSV path.
pub fn read_bars(path: &Path) -> Result<Vec<BarRow>> {
    let mut reader = Reader::from_reader(File::open(path)?);
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let bar: BarRow = row?;
        bars.push(bar);
    }
    Ok(bars)
}
