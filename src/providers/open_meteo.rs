//! Open-Meteo hourly forecast (keyless)

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{fetch_json, ConditionsProvider, HttpSource};
use crate::constants::OPEN_METEO_HOURLY_VARIABLES;
use crate::error::ProviderError;
use crate::models::OpenMeteoResponse;
use crate::readings::{Coordinate, WeatherReading};

pub struct OpenMeteoProvider {
    http: HttpSource,
}

impl OpenMeteoProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http: HttpSource::new(client, base_url),
        }
    }
}

#[async_trait]
impl ConditionsProvider for OpenMeteoProvider {
    type Reading = WeatherReading;

    #[instrument(skip(self), fields(provider = "open-meteo"))]
    async fn fetch(&self, coordinate: Coordinate) -> Result<WeatherReading, ProviderError> {
        debug!(base_url = %self.http.base_url, "Fetching Open-Meteo hourly forecast");

        let request = self.http.get("forecast").query(&[
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("hourly", OPEN_METEO_HOURLY_VARIABLES.to_string()),
            ("forecast_days", "1".to_string()),
        ]);

        let response: OpenMeteoResponse = fetch_json(request).await?;
        response
            .hourly
            .map(WeatherReading::Hourly)
            .ok_or(ProviderError::NoData)
    }

    fn source_label(&self) -> &'static str {
        "(Open-Meteo)"
    }
}
