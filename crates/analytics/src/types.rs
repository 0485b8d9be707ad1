use core_types::Symbol;
use serde::Serialize;

/// Descriptive statistics of one instrument's daily returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnStats {
    /// Number of daily-return observations (series length minus one).
    pub observations: usize,
    pub mean_daily_return: f64,
    /// Sample standard deviation of daily returns.
    pub volatility: f64,
    /// `last_close / first_close - 1` over the whole period.
    pub total_return: f64,
    pub best_day: f64,
    pub worst_day: f64,
}

/// A symmetric matrix of pairwise Pearson correlations of daily returns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<Symbol>,
    /// Row-major; `values[i][j]` is the correlation of `symbols[i]` with
    /// `symbols[j]`. `NaN` where fewer than two overlapping dates exist.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
