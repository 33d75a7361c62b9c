use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::IntegrationError;

/// Current conditions for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub weather: String,
    pub temperature: String,
    pub temperature_float: String,
    pub wind_direction: String,
    pub wind_power: String,
    pub humidity: String,
    pub humidity_float: String,
    pub report_time: String,
    pub update_time: String,
}

/// Weather lookup service (e.g. AMap).
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current weather for a city name. `IntegrationError::NotFound` if the
    /// city cannot be resolved.
    async fn current(&self, city: &str) -> Result<WeatherReport, IntegrationError>;
}
