use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The per-day classification emitted by the crossover scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// The short MA crossed above the long MA between yesterday and today.
    Buy,
    /// The short MA crossed below the long MA between yesterday and today.
    Sell,
    /// No crossover event, or one of the MAs is not yet defined.
    Hold,
}

/// Whether the simulated strategy holds the instrument on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl Position {
    /// Position exposure as a return multiplier: Long earns the day's
    /// return, Flat earns nothing.
    pub fn exposure(self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Flat => 0.0,
        }
    }
}

/// Parameters for the moving-average crossover strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossoverSettings {
    /// Trailing window of the fast MA, in days.
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    /// Trailing window of the slow MA, in days.
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

fn default_short_window() -> usize {
    20
}

fn default_long_window() -> usize {
    50
}

impl Default for CrossoverSettings {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

/// Everything the backtester derived for a single day of the input series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub close: f64,
    /// `None` while fewer than `short_window` observations exist.
    pub short_ma: Option<f64>,
    /// `None` while fewer than `long_window` observations exist.
    pub long_ma: Option<f64>,
    pub signal: Signal,
    pub position: Position,
    /// `None` on the first day (no prior close to compare against).
    pub daily_return: Option<f64>,
    /// Zero on the first day and whenever yesterday's position was Flat.
    pub strategy_return: f64,
    pub buy_hold_cumulative: f64,
    pub strategy_cumulative: f64,
}

/// Summary scalars over a completed backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BacktestSummary {
    /// Final compounded return of holding the instrument for the whole period.
    pub buy_hold_return: f64,
    /// Final compounded return of the crossover strategy.
    pub strategy_return: f64,
    /// `strategy_return - buy_hold_return`.
    pub edge: f64,
    pub buy_signals: u32,
    pub sell_signals: u32,
}

/// The complete, internally consistent output of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub days: Vec<DayRecord>,
    pub summary: BacktestSummary,
}
