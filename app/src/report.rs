use analytics::ReturnStats;
use backtester::BacktestSummary;
use core_types::Symbol;

/// Helper to print one instrument's return statistics in a readable format.
pub fn print_return_stats(symbol: &Symbol, stats: &ReturnStats) {
    println!("\n--- {} Return Statistics ---", symbol.0);
    println!("Observations:          {}", stats.observations);
    println!(
        "Average daily return:  {:.4} ({:.2}%)",
        stats.mean_daily_return,
        stats.mean_daily_return * 100.0
    );
    println!(
        "Daily volatility:      {:.4} ({:.2}%)",
        stats.volatility,
        stats.volatility * 100.0
    );
    println!(
        "Total return:          {:.4} ({:.2}%)",
        stats.total_return,
        stats.total_return * 100.0
    );
    println!("Best day:              {:+.2}%", stats.best_day * 100.0);
    println!("Worst day:             {:.2}%", stats.worst_day * 100.0);
}

/// Ranks instruments by total return and by volatility, as two sections.
pub fn print_returns_comparison(results: &[(Symbol, ReturnStats)]) {
    println!("\n--- Performance Ranking (total return) ---");
    let mut by_return: Vec<_> = results.iter().collect();
    by_return.sort_by(|a, b| {
        b.1.total_return
            .partial_cmp(&a.1.total_return)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, (symbol, stats)) in by_return.iter().enumerate() {
        println!(
            "  {}. {}: {:+.1}%",
            i + 1,
            symbol.0,
            stats.total_return * 100.0
        );
    }

    println!("\n--- Volatility Ranking (most to least volatile) ---");
    let mut by_volatility: Vec<_> = results.iter().collect();
    by_volatility.sort_by(|a, b| {
        b.1.volatility
            .partial_cmp(&a.1.volatility)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, (symbol, stats)) in by_volatility.iter().enumerate() {
        println!(
            "  {}. {}: {:.2}% daily volatility",
            i + 1,
            symbol.0,
            stats.volatility * 100.0
        );
    }
}

/// Helper to print a backtest summary in a readable format.
pub fn print_backtest_summary(symbol: &Symbol, summary: &BacktestSummary) {
    println!("\n--- {} Crossover Backtest ---", symbol.0);
    println!("-----------------------------------");
    println!("Buy & Hold Return:     {:.2}%", summary.buy_hold_return * 100.0);
    println!("Strategy Return:       {:.2}%", summary.strategy_return * 100.0);
    println!("Difference:            {:+.2}%", summary.edge * 100.0);
    println!("Buy Signals:           {}", summary.buy_signals);
    println!("Sell Signals:          {}", summary.sell_signals);
    println!("-----------------------------------");
}

/// The final strategy-vs-baseline ranking across every instrument tested.
pub fn print_ranking(ranked: &[(Symbol, BacktestSummary)]) {
    println!("\n--- Strategy Performance Ranking ---");
    println!("------------------------------------");
    for (i, (symbol, summary)) in ranked.iter().enumerate() {
        let verdict = if summary.edge > 0.0 { "beat" } else { "trailed" };
        println!(
            "{}. {}: strategy {} buy & hold by {:+.2}%",
            i + 1,
            symbol.0,
            verdict,
            summary.edge * 100.0
        );
    }
    println!("------------------------------------");
}
