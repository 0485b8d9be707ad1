pub mod moving_average;
pub mod ranking;
pub mod types;

use core_types::{Error, PriceSeries, Result};

pub use ranking::rank_by_edge;
pub use types::{
    BacktestResult, BacktestSummary, CrossoverSettings, DayRecord, Position, Signal,
};

use crate::moving_average::rolling_mean;

/// The engine for backtesting a moving-average crossover strategy over a
/// single instrument's price history.
///
/// The backtester is pure: it reads the caller's `PriceSeries`, derives the
/// signal, position and return series in a single forward pass each, and
/// returns a complete `BacktestResult`. There is no I/O, no clock and no
/// randomness, so identical inputs always produce identical results.
#[derive(Debug, Clone, Default)]
pub struct CrossoverBacktester {
    settings: CrossoverSettings,
}

impl CrossoverBacktester {
    pub fn new(settings: CrossoverSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CrossoverSettings {
        &self.settings
    }

    /// Runs the crossover backtest over `prices`.
    ///
    /// A `short_window >= long_window` configuration still runs, but the
    /// output no longer describes a conventional crossover strategy; that
    /// is the caller's responsibility, not an error. Windows longer than
    /// the series are also valid: every MA entry is undefined, every signal
    /// is `Hold` and the position stays `Flat` throughout.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if either window is zero. Malformed series
    /// (empty, unordered, non-positive prices) are rejected earlier, by
    /// `PriceSeries::new`.
    pub fn run(&self, prices: &PriceSeries) -> Result<BacktestResult> {
        let CrossoverSettings {
            short_window,
            long_window,
        } = self.settings;
        if short_window == 0 || long_window == 0 {
            return Err(Error::InvalidInput(format!(
                "window sizes must be positive (got short={short_window}, long={long_window})"
            )));
        }

        let closes: Vec<f64> = prices.closes().collect();

        // --- 1. Moving averages ---
        let short_ma = rolling_mean(&closes, short_window);
        let long_ma = rolling_mean(&closes, long_window);

        // --- 2. Crossover signals ---
        // A signal needs both MAs defined today and yesterday; day 0 and the
        // warm-up region are always Hold.
        let signals: Vec<Signal> = (0..closes.len())
            .map(|i| {
                if i == 0 {
                    return Signal::Hold;
                }
                match (short_ma[i], long_ma[i], short_ma[i - 1], long_ma[i - 1]) {
                    (Some(s), Some(l), Some(ps), Some(pl)) => {
                        if s > l && ps <= pl {
                            Signal::Buy
                        } else if s < l && ps >= pl {
                            Signal::Sell
                        } else {
                            Signal::Hold
                        }
                    }
                    _ => Signal::Hold,
                }
            })
            .collect();

        // --- 3. Position fold ---
        // A strict left-to-right fold with no lookahead: Flat at day 0, Long
        // after a Buy, Flat after a Sell, otherwise carried forward.
        let mut positions = Vec::with_capacity(signals.len());
        let mut position = Position::Flat;
        for signal in &signals {
            position = match signal {
                Signal::Buy => Position::Long,
                Signal::Sell => Position::Flat,
                Signal::Hold => position,
            };
            positions.push(position);
        }

        // --- 4. Return series ---
        // The strategy earns a day's return only if it entered the day
        // already holding the position: StrategyReturn(i) uses Position(i-1),
        // never the same-day signal.
        let mut days = Vec::with_capacity(closes.len());
        let mut buy_hold_cumulative = 1.0;
        let mut strategy_cumulative = 1.0;
        for (i, point) in prices.points().iter().enumerate() {
            let daily_return = (i > 0).then(|| closes[i] / closes[i - 1] - 1.0);
            let strategy_return = daily_return
                .map(|r| r * positions[i - 1].exposure())
                .unwrap_or(0.0);
            buy_hold_cumulative *= 1.0 + daily_return.unwrap_or(0.0);
            strategy_cumulative *= 1.0 + strategy_return;

            days.push(DayRecord {
                date: point.date,
                close: point.close,
                short_ma: short_ma[i],
                long_ma: long_ma[i],
                signal: signals[i],
                position: positions[i],
                daily_return,
                strategy_return,
                buy_hold_cumulative: buy_hold_cumulative - 1.0,
                strategy_cumulative: strategy_cumulative - 1.0,
            });
        }

        // --- 5. Summary ---
        let buy_signals = signals.iter().filter(|s| **s == Signal::Buy).count() as u32;
        let sell_signals = signals.iter().filter(|s| **s == Signal::Sell).count() as u32;
        let buy_hold_return = buy_hold_cumulative - 1.0;
        let strategy_return = strategy_cumulative - 1.0;

        tracing::debug!(
            days = days.len(),
            buy_signals,
            sell_signals,
            buy_hold_return,
            strategy_return,
            "Crossover backtest complete."
        );

        Ok(BacktestResult {
            days,
            summary: BacktestSummary {
                buy_hold_return,
                strategy_return,
                edge: strategy_return - buy_hold_return,
                buy_signals,
                sell_signals,
            },
        })
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

    fn run(closes: &[f64], short: usize, long: usize) -> BacktestResult {
        CrossoverBacktester::new(CrossoverSettings {
            short_window: short,
            long_window: long,
        })
        .run(&series(closes))
        .unwrap()
    }

    #[test]
    fn derived_series_match_input_length() {
        let result = run(&[10.0, 11.0, 12.0, 11.0, 13.0], 2, 3);
        assert_eq!(result.days.len(), 5);
    }

    #[test]
    fn hand_computed_six_day_scenario() {
        // prices [10, 11, 9, 12, 15, 8], short=2, long=3:
        //   short MA: -, 10.5, 10, 10.5, 13.5, 11.5
        //   long MA:  -, -,    10, 32/3, 12,   35/3
        // Day 3 is a downward cross (10 >= 10 yesterday, 10.5 < 32/3 today),
        // day 4 an upward cross, day 5 a downward cross again.
        let result = run(&[10.0, 11.0, 9.0, 12.0, 15.0, 8.0], 2, 3);

        let signals: Vec<Signal> = result.days.iter().map(|d| d.signal).collect();
        assert_eq!(
            signals,
            vec![
                Signal::Hold,
                Signal::Hold,
                Signal::Hold,
                Signal::Sell,
                Signal::Buy,
                Signal::Sell,
            ]
        );

        let positions: Vec<Position> = result.days.iter().map(|d| d.position).collect();
        assert_eq!(
            positions,
            vec![
                Position::Flat,
                Position::Flat,
                Position::Flat,
                Position::Flat,
                Position::Long,
                Position::Flat,
            ]
        );

        // The only day entered Long is day 5, so the strategy takes exactly
        // that day's return: 8/15 - 1.
        for day in &result.days[..5] {
            assert_eq!(day.strategy_return, 0.0);
        }
        assert_relative_eq!(result.days[5].strategy_return, 8.0 / 15.0 - 1.0);
        assert_relative_eq!(result.summary.strategy_return, 8.0 / 15.0 - 1.0);
        assert_relative_eq!(result.summary.buy_hold_return, -0.2, max_relative = 1e-12);
        assert_eq!(result.summary.buy_signals, 1);
        assert_eq!(result.summary.sell_signals, 2);
    }

    #[test]
    fn position_only_flips_on_non_hold_signals() {
        let result = run(&[10.0, 11.0, 9.0, 12.0, 15.0, 8.0, 9.0, 14.0], 2, 4);
        let mut previous = Position::Flat;
        for day in &result.days {
            if day.signal == Signal::Hold {
                assert_eq!(day.position, previous);
            }
            previous = day.position;
        }
        assert_eq!(result.days[0].position, Position::Flat);
    }

    #[test]
    fn strategy_return_is_zero_when_entering_the_day_flat() {
        let result = run(&[10.0, 11.0, 9.0, 12.0, 15.0, 8.0, 9.0, 14.0], 2, 3);
        for i in 1..result.days.len() {
            if result.days[i - 1].position == Position::Flat {
                assert_eq!(result.days[i].strategy_return, 0.0);
            }
        }
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let prices = series(&[10.0, 11.0, 9.0, 12.0, 15.0, 8.0]);
        let backtester = CrossoverBacktester::default();
        assert_eq!(
            backtester.run(&prices).unwrap(),
            backtester.run(&prices).unwrap()
        );
    }

    #[test]
    fn constant_prices_never_signal() {
        let result = run(&[42.0; 30], 3, 7);
        for day in &result.days {
            assert_eq!(day.signal, Signal::Hold);
            assert_eq!(day.position, Position::Flat);
            assert_eq!(day.daily_return.unwrap_or(0.0), 0.0);
        }
        assert_eq!(result.summary.buy_hold_return, 0.0);
        assert_eq!(result.summary.strategy_return, 0.0);
    }

    #[test]
    fn window_longer_than_series_stays_flat() {
        let result = run(&[10.0, 20.0, 5.0, 40.0], 5, 10);
        assert!(result.days.iter().all(|d| d.short_ma.is_none()));
        assert!(result.days.iter().all(|d| d.signal == Signal::Hold));
        assert!(result.days.iter().all(|d| d.position == Position::Flat));
        assert_eq!(result.summary.strategy_return, 0.0);
        // Buy-and-hold still moves with the price.
        assert_relative_eq!(result.summary.buy_hold_return, 3.0);
    }

    #[test]
    fn zero_windows_are_invalid() {
        let prices = series(&[10.0, 11.0]);
        let backtester = CrossoverBacktester::new(CrossoverSettings {
            short_window: 0,
            long_window: 50,
        });
        assert!(backtester.run(&prices).is_err());
    }

    #[test]
    fn single_day_series_is_degenerate_but_valid() {
        let result = run(&[10.0], 20, 50);
        assert_eq!(result.days.len(), 1);
        assert_eq!(result.days[0].signal, Signal::Hold);
        assert_eq!(result.days[0].position, Position::Flat);
        assert_eq!(result.days[0].daily_return, None);
        assert_eq!(result.summary.buy_hold_return, 0.0);
    }
}
