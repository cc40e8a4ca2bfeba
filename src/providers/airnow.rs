//! AirNow current observations (requires an API key)

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{fetch_json, ConditionsProvider, HttpSource};
use crate::error::ProviderError;
use crate::models::AirNowObservation;
use crate::readings::{AirQualityReading, Coordinate};

/// Search radius around the coordinate, in miles
const SEARCH_DISTANCE_MILES: u32 = 100;

pub struct AirNowProvider {
    http: HttpSource,
    api_key: String,
}

impl AirNowProvider {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: HttpSource::new(client, base_url),
            api_key: api_key.into(),
        }
    }

    /// AirNow reports AQI sub-indices per parameter; PM10 is not used.
    fn extract(observations: &[AirNowObservation]) -> AirQualityReading {
        let aqi_for = |name: &str| {
            observations
                .iter()
                .find(|o| o.parameter_name == name)
                .and_then(|o| o.aqi)
        };

        AirQualityReading {
            pm25: aqi_for("PM2.5"),
            pm10: None,
            o3: aqi_for("O3"),
        }
    }
}

#[async_trait]
impl ConditionsProvider for AirNowProvider {
    type Reading = AirQualityReading;

    #[instrument(skip(self), fields(provider = "airnow"))]
    async fn fetch(&self, coordinate: Coordinate) -> Result<AirQualityReading, ProviderError> {
        debug!(base_url = %self.http.base_url, "Fetching AirNow observations");

        let request = self.http.get("aq/observation/latLong/current/").query(&[
            ("format", "application/json".to_string()),
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("distance", SEARCH_DISTANCE_MILES.to_string()),
            ("API_KEY", self.api_key.clone()),
        ]);

        let observations: Vec<AirNowObservation> = fetch_json(request).await?;
        if observations.is_empty() {
            return Err(ProviderError::NoData);
        }

        let reading = Self::extract(&observations);
        if reading.is_empty() {
            return Err(ProviderError::NoData);
        }
        Ok(reading)
    }

    fn source_label(&self) -> &'static str {
        "(AirNow)"
    }
}
