use std::collections::BTreeMap;

use chrono::NaiveDate;
use core_types::{PriceSeries, Symbol};
use itertools::Itertools;

use crate::engine::AnalyticsEngine;
use crate::types::CorrelationMatrix;

/// Pairwise Pearson correlation of daily returns across instruments.
///
/// Histories rarely cover identical date ranges, so each pair is correlated
/// over the intersection of its trading dates. Pairs with fewer than two
/// overlapping observations (or a zero-variance leg) get `NaN`.
pub fn correlation_matrix(series: &[(Symbol, PriceSeries)]) -> CorrelationMatrix {
    let engine = AnalyticsEngine::new();

    // Daily returns keyed by the date they were realized on.
    let keyed: Vec<BTreeMap<NaiveDate, f64>> = series
        .iter()
        .map(|(_, prices)| {
            let returns = engine.daily_returns(prices);
            prices
                .dates()
                .skip(1)
                .zip(returns)
                .collect()
        })
        .collect();

    let n = series.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson_on_shared_dates(&keyed[i], &keyed[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        symbols: series.iter().map(|(s, _)| s.clone()).collect(),
        values,
    }
}

/// The most and least correlated distinct pairs in a matrix, as
/// `(row, column, correlation)` index tuples. `None` when fewer than two
/// instruments are present or every off-diagonal entry is `NaN`.
pub fn extreme_pairs(
    matrix: &CorrelationMatrix,
) -> Option<((usize, usize, f64), (usize, usize, f64))> {
    let pairs: Vec<(usize, usize, f64)> = (0..matrix.len())
        .tuple_combinations()
        .map(|(i, j)| (i, j, matrix.get(i, j)))
        .filter(|(_, _, r)| r.is_finite())
        .collect();

    let highest = pairs
        .iter()
        .copied()
        .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap())?;
    let lowest = pairs
        .iter()
        .copied()
        .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap())?;
    Some((highest, lowest))
}

fn pearson_on_shared_dates(
    a: &BTreeMap<NaiveDate, f64>,
    b: &BTreeMap<NaiveDate, f64>,
) -> f64 {
    let paired: Vec<(f64, f64)> = a
        .iter()
        .filter_map(|(date, ra)| b.get(date).map(|rb| (*ra, *rb)))
        .collect();
    if paired.len() < 2 {
        return f64::NAN;
    }

    let n = paired.len() as f64;
    let mean_a = paired.iter().map(|(ra, _)| ra).sum::<f64>() / n;
    let mean_b = paired.iter().map(|(_, rb)| rb).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (ra, rb) in &paired {
        let da = ra - mean_a;
        let db = rb - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
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
    fn identical_movement_correlates_perfectly() {
        let matrix = correlation_matrix(&[
            (Symbol("A".into()), series(&[10.0, 11.0, 9.0, 12.0])),
            (Symbol("B".into()), series(&[20.0, 22.0, 18.0, 24.0])),
        ]);
        assert_relative_eq!(matrix.get(0, 1), 1.0, max_relative = 1e-12);
        assert_eq!(matrix.get(0, 0), 1.0);
    }

    #[test]
    fn mirrored_movement_correlates_negatively() {
        // B's returns are exactly the negation of A's.
        let a = series(&[100.0, 110.0, 99.0]);
        let b = series(&[100.0, 90.0, 99.0]);
        let matrix =
            correlation_matrix(&[(Symbol("A".into()), a), (Symbol("B".into()), b)]);
        assert_relative_eq!(matrix.get(0, 1), -1.0, max_relative = 1e-12);
    }

    #[test]
    fn disjoint_dates_give_nan() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let late = PriceSeries::new(
            (0..4)
                .map(|i| PricePoint {
                    date: start + chrono::Days::new(i),
                    close: 50.0 + i as f64,
                })
                .collect(),
        )
        .unwrap();
        let matrix = correlation_matrix(&[
            (Symbol("A".into()), series(&[10.0, 11.0, 9.0, 12.0])),
            (Symbol("B".into()), late),
        ]);
        assert!(matrix.get(0, 1).is_nan());
    }

    #[test]
    fn extreme_pairs_pick_highest_and_lowest() {
        let a = series(&[10.0, 11.0, 9.0, 12.0]);
        let b = series(&[20.0, 22.0, 18.0, 24.0]); // same returns as a
        let c = series(&[10.0, 9.0, 11.0, 8.0]); // roughly opposite
        let matrix = correlation_matrix(&[
            (Symbol("A".into()), a),
            (Symbol("B".into()), b),
            (Symbol("C".into()), c),
        ]);
        let ((hi_i, hi_j, hi_r), (_, lo_j, lo_r)) = extreme_pairs(&matrix).unwrap();
        assert_eq!((hi_i, hi_j), (0, 1));
        assert_relative_eq!(hi_r, 1.0, max_relative = 1e-12);
        assert_eq!(lo_j, 2);
        assert!(lo_r < 0.0);
    }
}
