use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A ticker symbol, e.g. "GOOGL".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One daily observation: the trading date and the closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// A validated, chronologically ordered series of daily closing prices.
///
/// Construction is the only place the invariants are checked: the series is
/// non-empty, dates are strictly increasing, and every close is a positive
/// finite number. Everything downstream (statistics, backtests, charts) may
/// rely on those invariants and only ever reads the series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates and wraps a sequence of price points.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidInput("price series is empty".into()));
        }
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(Error::InvalidInput(format!(
                    "dates must be strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        for point in &points {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(Error::InvalidInput(format!(
                    "non-positive close {} on {}",
                    point.close, point.date
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        // Cannot actually be empty post-construction, but the usual pair
        // of accessors keeps call sites idiomatic.
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }
}
