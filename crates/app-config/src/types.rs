use backtester::CrossoverSettings;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the market-data provider.
    pub provider: ProviderSettings,
    /// Where fetched histories and rendered charts live on disk.
    pub data: DataSettings,
    /// The instruments every command operates on, in ranking tie-break order.
    pub instruments: Vec<String>,
    #[serde(default)]
    pub strategy: StrategySettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProviderSettings {
    /// The REST base URL of the chart-data endpoint.
    pub rest_base_url: String,
    /// Historical span to request, e.g. "2y".
    #[serde(default = "default_range")]
    pub range: String,
    /// Bar interval to request, e.g. "1d".
    #[serde(default = "default_interval")]
    pub interval: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DataSettings {
    pub data_dir: String,
    pub charts_dir: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct StrategySettings {
    #[serde(default)]
    pub crossover: CrossoverSettings,
}

fn default_range() -> String {
    "2y".into()
}

fn default_interval() -> String {
    "1d".into()
}
