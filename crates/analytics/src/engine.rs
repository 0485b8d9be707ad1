use core_types::PriceSeries;

use crate::types::ReturnStats;

/// The engine responsible for descriptive statistics over price histories.
#[derive(Debug, Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simple percentage-change daily returns of a price series.
    ///
    /// One entry per consecutive day pair, so the output is one shorter
    /// than the input series.
    pub fn daily_returns(&self, prices: &PriceSeries) -> Vec<f64> {
        prices
            .points()
            .windows(2)
            .map(|pair| pair[1].close / pair[0].close - 1.0)
            .collect()
    }

    /// Calculates the full per-instrument return statistics.
    ///
    /// A single-day series has no returns to describe; every statistic is
    /// zero and `observations` is zero.
    pub fn return_stats(&self, prices: &PriceSeries) -> ReturnStats {
        let returns = self.daily_returns(prices);
        if returns.is_empty() {
            return ReturnStats {
                observations: 0,
                mean_daily_return: 0.0,
                volatility: 0.0,
                total_return: 0.0,
                best_day: 0.0,
                worst_day: 0.0,
            };
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;

        // Sample standard deviation; a single observation has no spread.
        let volatility = if returns.len() > 1 {
            let variance =
                returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        } else {
            0.0
        };

        let best_day = returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let worst_day = returns.iter().cloned().fold(f64::INFINITY, f64::min);
        let total_return = prices.last().close / prices.first().close - 1.0;

        ReturnStats {
            observations: returns.len(),
            mean_daily_return: mean,
            volatility,
            total_return,
            best_day,
            worst_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use core_types::PricePoint;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, close)| PricePoint {
                    date: start + chrono::Days::new(i as u64),
                    close: *close,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn daily_returns_are_percentage_changes() {
        let engine = AnalyticsEngine::new();
        let returns = engine.daily_returns(&series(&[10.0, 11.0, 9.9]));
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.1, max_relative = 1e-12);
        assert_relative_eq!(returns[1], -0.1, max_relative = 1e-12);
    }

    #[test]
    fn stats_over_a_known_series() {
        let engine = AnalyticsEngine::new();
        let stats = engine.return_stats(&series(&[100.0, 110.0, 99.0, 118.8]));
        // Returns: +10%, -10%, +20%.
        assert_eq!(stats.observations, 3);
        assert_relative_eq!(stats.mean_daily_return, 0.2 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(stats.best_day, 0.2, max_relative = 1e-12);
        assert_relative_eq!(stats.worst_day, -0.1, max_relative = 1e-12);
        assert_relative_eq!(stats.total_return, 0.188, max_relative = 1e-12);
        // Sample variance of [0.1, -0.1, 0.2] around 1/15.
        let mean = 0.2 / 3.0;
        let expected = (((0.1f64 - mean).powi(2)
            + (-0.1f64 - mean).powi(2)
            + (0.2f64 - mean).powi(2))
            / 2.0)
            .sqrt();
        assert_relative_eq!(stats.volatility, expected, max_relative = 1e-12);
    }

    #[test]
    fn single_day_series_has_empty_stats() {
        let stats = AnalyticsEngine::new().return_stats(&series(&[42.0]));
        assert_eq!(stats.observations, 0);
        assert_eq!(stats.volatility, 0.0);
        assert_eq!(stats.total_return, 0.0);
    }

    #[test]
    fn constant_prices_have_zero_everything() {
        let stats = AnalyticsEngine::new().return_stats(&series(&[5.0; 10]));
        assert_eq!(stats.mean_daily_return, 0.0);
        assert_eq!(stats.volatility, 0.0);
        assert_eq!(stats.total_return, 0.0);
    }
}
