use app_config::types::ProviderSettings;
use chrono::DateTime;
use core_types::Symbol;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// A thin async client for the provider's chart-data REST endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    range: String,
    interval: String,
}

impl ApiClient {
    /// Constructs a new ApiClient from ProviderSettings.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let http_client = reqwest::Client::new();
        Ok(ApiClient {
            http_client,
            base_url: settings.rest_base_url.clone(),
            range: settings.range.clone(),
            interval: settings.interval.clone(),
        })
    }

    /// Fetches the configured historical span of daily bars for a symbol.
    ///
    /// Non-trading entries (the endpoint pads holidays with nulls) are
    /// dropped, so the returned bars are exactly the days with a close.
    pub async fn get_daily_history(&self, symbol: &Symbol) -> Result<Vec<DailyBar>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol.0);
        tracing::debug!(symbol = %symbol.0, url, range = %self.range, "Requesting daily history.");

        let response: ChartResponse = self
            .http_client
            .get(&url)
            .query(&[("range", self.range.as_str()), ("interval", self.interval.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.chart.error {
            return Err(Error::ApiError {
                code: err.code,
                msg: err.description,
            });
        }

        let result = response
            .chart
            .result
            .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
            .ok_or_else(|| Error::MalformedResponse("empty chart result".into()))?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("missing quote block".into()))?;

        Ok(assemble_bars(&result.timestamp, &quote))
    }
}

/// Zips the endpoint's parallel arrays into bars, skipping entries where
/// any field is null.
fn assemble_bars(timestamps: &[i64], quote: &QuoteBlock) -> Vec<DailyBar> {
    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let fields = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = fields else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        bars.push(DailyBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_chart_envelope_and_skips_null_entries() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704240000, 1704326400],
                    "indicators": {
                        "quote": [{
                            "open":   [139.5, null, 141.0],
                            "high":   [141.2, null, 142.3],
                            "low":    [139.0, null, 140.1],
                            "close":  [140.2, null, 141.9],
                            "volume": [1000000.0, null, 1200000.0]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let result = &response.chart.result.as_ref().unwrap()[0];
        let bars = assemble_bars(&result.timestamp, &result.indicators.quote[0]);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 140.2);
        assert_eq!(bars[1].close, 141.9);
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn an_error_envelope_deserializes() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found" }
            }
        }"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let err = response.chart.error.unwrap();
        assert_eq!(err.code, "Not Found");
    }
}
