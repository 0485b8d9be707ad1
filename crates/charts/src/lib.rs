//! Chart rendering for price histories, backtest results and correlation
//! matrices. Every function writes a PNG to the given path.

pub mod error;

use std::path::Path;

use analytics::CorrelationMatrix;
use backtester::{BacktestResult, Signal};
use core_types::{PriceSeries, Symbol};
use plotters::prelude::*;

pub use error::{Error, Result};

const PALETTE: [RGBColor; 5] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
];

/// One close-price line per instrument on a shared chart.
pub fn price_comparison(series: &[(Symbol, PriceSeries)], output: &Path) -> Result<()> {
    let root = BitMapBackend::new(output, (1280, 720)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;

    let max_len = series.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    let (min_price, max_price) = series
        .iter()
        .flat_map(|(_, s)| s.closes())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });

    let mut chart = ChartBuilder::on(&root)
        .caption("Close Price Comparison", ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..max_len.max(1), min_price..max_price)
        .map_err(Error::render)?;

    chart
        .configure_mesh()
        .y_desc("Price (USD)")
        .x_desc("Trading day")
        .draw()
        .map_err(Error::render)?;

    for (i, (symbol, prices)) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                prices.closes().enumerate(),
                color.stroke_width(2),
            ))
            .map_err(Error::render)?
            .label(symbol.0.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .draw()
        .map_err(Error::render)?;
    root.present().map_err(Error::render)?;

    tracing::info!(path = %output.display(), "Price comparison chart saved.");
    Ok(())
}

/// Two stacked panels for one instrument's backtest: price with both MAs
/// and Buy/Sell markers on top, the cumulative-return comparison below.
pub fn strategy_chart(symbol: &Symbol, result: &BacktestResult, output: &Path) -> Result<()> {
    let root = BitMapBackend::new(output, (1280, 900)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;
    let (upper, lower) = root.split_vertically(500);

    let days = &result.days;
    let n = days.len();

    // --- Upper panel: price, MAs, signal markers ---
    let (min_price, max_price) = days
        .iter()
        .map(|d| d.close)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });

    let mut price_chart = ChartBuilder::on(&upper)
        .caption(
            format!("{} - Moving Average Crossover", symbol.0),
            ("sans-serif", 28).into_font(),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..n.max(1), min_price..max_price)
        .map_err(Error::render)?;
    price_chart
        .configure_mesh()
        .y_desc("Price (USD)")
        .draw()
        .map_err(Error::render)?;

    price_chart
        .draw_series(LineSeries::new(
            days.iter().enumerate().map(|(i, d)| (i, d.close)),
            BLUE.stroke_width(1),
        ))
        .map_err(Error::render)?
        .label("Close")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    for (ma, color, label) in [
        (days.iter().map(|d| d.short_ma).collect::<Vec<_>>(), PALETTE[1], "Short MA"),
        (days.iter().map(|d| d.long_ma).collect::<Vec<_>>(), PALETTE[2], "Long MA"),
    ] {
        price_chart
            .draw_series(LineSeries::new(
                ma.iter().enumerate().filter_map(|(i, &v)| v.map(|v| (i, v))),
                color.stroke_width(2),
            ))
            .map_err(Error::render)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    // BUY as green upward triangles, SELL as red circles.
    price_chart
        .draw_series(days.iter().enumerate().filter(|(_, d)| d.signal == Signal::Buy).map(
            |(i, d)| TriangleMarker::new((i, d.close), 8, GREEN.filled()),
        ))
        .map_err(Error::render)?
        .label("Buy")
        .legend(|(x, y)| TriangleMarker::new((x + 10, y), 8, GREEN.filled()));
    price_chart
        .draw_series(days.iter().enumerate().filter(|(_, d)| d.signal == Signal::Sell).map(
            |(i, d)| Circle::new((i, d.close), 5, RED.filled()),
        ))
        .map_err(Error::render)?
        .label("Sell")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));

    price_chart
        .configure_series_labels()
        .border_style(BLACK)
        .draw()
        .map_err(Error::render)?;

    // --- Lower panel: cumulative return comparison ---
    let (min_ret, max_ret) = days
        .iter()
        .flat_map(|d| [d.buy_hold_cumulative, d.strategy_cumulative])
        .fold((0.0f64, 0.0f64), |(lo, hi), r| (lo.min(r), hi.max(r)));

    let mut return_chart = ChartBuilder::on(&lower)
        .caption("Strategy vs Buy & Hold", ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..n.max(1), (min_ret * 100.0)..(max_ret * 100.0).max(1.0))
        .map_err(Error::render)?;
    return_chart
        .configure_mesh()
        .y_desc("Cumulative Return (%)")
        .x_desc("Trading day")
        .draw()
        .map_err(Error::render)?;

    return_chart
        .draw_series(LineSeries::new(
            days.iter()
                .enumerate()
                .map(|(i, d)| (i, d.buy_hold_cumulative * 100.0)),
            BLUE.stroke_width(2),
        ))
        .map_err(Error::render)?
        .label("Buy & Hold")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    return_chart
        .draw_series(LineSeries::new(
            days.iter()
                .enumerate()
                .map(|(i, d)| (i, d.strategy_cumulative * 100.0)),
            PALETTE[1].stroke_width(2),
        ))
        .map_err(Error::render)?
        .label("Crossover Strategy")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PALETTE[1]));

    return_chart
        .configure_series_labels()
        .border_style(BLACK)
        .draw()
        .map_err(Error::render)?;
    root.present().map_err(Error::render)?;

    tracing::info!(symbol = %symbol.0, path = %output.display(), "Strategy chart saved.");
    Ok(())
}

/// A red-white-blue heatmap of the correlation matrix, with the coefficient
/// printed in each cell.
pub fn correlation_heatmap(matrix: &CorrelationMatrix, output: &Path) -> Result<()> {
    let root = BitMapBackend::new(output, (900, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::render)?;

    let n = matrix.len();
    let symbols = matrix.symbols.clone();
    let mut chart = ChartBuilder::on(&root)
        .caption("Daily Return Correlation", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..n as f64, 0.0..n as f64)
        .map_err(Error::render)?;

    let x_symbols = symbols.clone();
    let y_symbols = symbols.clone();
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&move |v| label_for(&x_symbols, *v))
        .y_label_formatter(&move |v| label_for(&y_symbols, *v))
        .draw()
        .map_err(Error::render)?;

    for i in 0..n {
        for j in 0..n {
            let r = matrix.get(i, j);
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(j as f64, i as f64), (j as f64 + 1.0, i as f64 + 1.0)],
                    heatmap_color(r).filled(),
                )))
                .map_err(Error::render)?;

            let text_color = if r.is_finite() && r.abs() > 0.5 { WHITE } else { BLACK };
            let text = if r.is_finite() {
                format!("{:.2}", r)
            } else {
                "n/a".to_string()
            };
            chart
                .draw_series(std::iter::once(Text::new(
                    text,
                    (j as f64 + 0.38, i as f64 + 0.45),
                    ("sans-serif", 18).into_font().color(&text_color),
                )))
                .map_err(Error::render)?;
        }
    }

    root.present().map_err(Error::render)?;
    tracing::info!(path = %output.display(), "Correlation heatmap saved.");
    Ok(())
}

fn label_for(symbols: &[Symbol], axis_value: f64) -> String {
    let idx = axis_value.floor() as usize;
    symbols
        .get(idx)
        .map(|s| s.0.clone())
        .unwrap_or_default()
}

/// Maps a correlation in [-1, 1] to a red (negative) / white (zero) /
/// blue (positive) gradient. `NaN` renders as a neutral grey.
fn heatmap_color(r: f64) -> RGBColor {
    if !r.is_finite() {
        return RGBColor(200, 200, 200);
    }
    let r = r.clamp(-1.0, 1.0);
    let blend = |from: u8, to: u8, t: f64| -> u8 {
        (from as f64 + (to as f64 - from as f64) * t).round() as u8
    };
    if r >= 0.0 {
        // White toward a deep blue.
        RGBColor(blend(255, 33, r), blend(255, 102, r), blend(255, 172, r))
    } else {
        // White toward a deep red.
        let t = -r;
        RGBColor(blend(255, 178, t), blend(255, 24, t), blend(255, 43, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heatmap_color_endpoints() {
        assert_eq!(heatmap_color(0.0), RGBColor(255, 255, 255));
        assert_eq!(heatmap_color(1.0), RGBColor(33, 102, 172));
        assert_eq!(heatmap_color(-1.0), RGBColor(178, 24, 43));
        assert_eq!(heatmap_color(f64::NAN), RGBColor(200, 200, 200));
    }

    #[test]
    fn heatmap_color_clamps_out_of_range() {
        assert_eq!(heatmap_color(2.0), heatmap_color(1.0));
        assert_eq!(heatmap_color(-3.0), heatmap_color(-1.0));
    }
}
