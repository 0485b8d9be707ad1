use core_types::Symbol;

use crate::types::BacktestSummary;

/// Orders instruments by how far the crossover strategy beat (or trailed)
/// its buy-and-hold baseline, best first.
///
/// Pure function over already-computed summaries; nothing is recomputed.
/// The sort is stable, so instruments with equal edge keep their input
/// order.
pub fn rank_by_edge(results: &[(Symbol, BacktestSummary)]) -> Vec<(Symbol, BacktestSummary)> {
    let mut ranked: Vec<(Symbol, BacktestSummary)> = results.to_vec();
    ranked.sort_by(|a, b| {
        b.1.edge
            .partial_cmp(&a.1.edge)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
