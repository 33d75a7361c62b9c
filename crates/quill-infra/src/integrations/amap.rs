//! AMap (Gaode) geocoding + live weather adapter.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use quill_core::domain::format_timestamp;
use quill_core::ports::{IntegrationError, WeatherProvider, WeatherReport};

use super::{http_client, invalid_response, upstream};

/// AMap API settings.
#[derive(Debug, Clone)]
pub struct AmapConfig {
    pub api_key: String,
    pub base_url: String,
}

impl AmapConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://restapi.amap.com";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    geocodes: Vec<Geocode>,
}

#[derive(Debug, Deserialize)]
struct Geocode {
    adcode: String,
}

#[derive(Debug, Deserialize)]
struct WeatherInfoResponse {
    status: String,
    #[serde(default)]
    lives: Vec<Live>,
}

#[derive(Debug, Deserialize)]
struct Live {
    city: String,
    weather: String,
    temperature: String,
    temperature_float: Option<String>,
    winddirection: String,
    windpower: String,
    humidity: String,
    humidity_float: Option<String>,
    reporttime: String,
}

impl Live {
    fn into_report(self, update_time: String) -> WeatherReport {
        WeatherReport {
            temperature_float: self
                .temperature_float
                .unwrap_or_else(|| self.temperature.clone()),
            humidity_float: self.humidity_float.unwrap_or_else(|| self.humidity.clone()),
            city: self.city,
            weather: self.weather,
            temperature: self.temperature,
            wind_direction: self.winddirection,
            wind_power: self.windpower,
            humidity: self.humidity,
            report_time: self.reporttime,
            update_time,
        }
    }
}

impl WeatherInfoResponse {
    fn first_live(self) -> Option<Live> {
        if self.status != "1" {
            return None;
        }
        self.lives.into_iter().next()
    }
}

/// Weather provider backed by AMap's REST API.
pub struct AmapWeatherProvider {
    config: AmapConfig,
    client: reqwest::Client,
}

impl AmapWeatherProvider {
    pub fn new(config: AmapConfig) -> Result<Self, IntegrationError> {
        Ok(Self {
            config,
            client: http_client()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn adcode(&self, city: &str) -> Result<String, IntegrationError> {
        let response: GeocodeResponse = self
            .client
            .get(self.url("/v3/geocode/geo"))
            .query(&[("address", city), ("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(upstream)?
            .json()
            .await
            .map_err(invalid_response)?;

        response
            .geocodes
            .into_iter()
            .next()
            .map(|g| g.adcode)
            .ok_or_else(|| IntegrationError::NotFound(format!("city {city}")))
    }
}

#[async_trait]
impl WeatherProvider for AmapWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherReport, IntegrationError> {
        let adcode = self.adcode(city).await?;
        tracing::debug!(city = %city, adcode = %adcode, "Resolved city");

        let response: WeatherInfoResponse = self
            .client
            .get(self.url("/v3/weather/weatherInfo"))
            .query(&[("city", adcode.as_str()), ("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(upstream)?
            .json()
            .await
            .map_err(invalid_response)?;

        let live = response.first_live().ok_or_else(|| {
            IntegrationError::InvalidResponse(format!("no live weather for {adcode}"))
        })?;

        Ok(live.into_report(format_timestamp(Utc::now())))
    }
}
