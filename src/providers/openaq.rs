//! OpenAQ latest measurements (keyless)

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::{fetch_json, ConditionsProvider, HttpSource};
use crate::error::ProviderError;
use crate::models::{OpenAqMeasurement, OpenAqResponse};
use crate::readings::{AirQualityReading, Coordinate};

/// Search radius around the coordinate, in metres
const SEARCH_RADIUS_M: u32 = 50_000;

pub struct OpenAqProvider {
    http: HttpSource,
}

impl OpenAqProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http: HttpSource::new(client, base_url),
        }
    }

    /// Only the nearest location is read.
    fn extract(response: &OpenAqResponse) -> Option<AirQualityReading> {
        let measurements = &response.results.first()?.measurements;
        let value_for = |parameter: &str| {
            measurements
                .iter()
                .find(|m: &&OpenAqMeasurement| m.parameter == parameter)
                .and_then(|m| m.value)
        };

        Some(AirQualityReading {
            pm25: value_for("pm25"),
            pm10: value_for("pm10"),
            o3: value_for("o3"),
        })
    }
}

#[async_trait]
impl ConditionsProvider for OpenAqProvider {
    type Reading = AirQualityReading;

    #[instrument(skip(self), fields(provider = "openaq"))]
    async fn fetch(&self, coordinate: Coordinate) -> Result<AirQualityReading, ProviderError> {
        debug!(base_url = %self.http.base_url, "Fetching OpenAQ latest measurements");

        let request = self.http.get("latest").query(&[
            (
                "coordinates",
                format!("{},{}", coordinate.latitude, coordinate.longitude),
            ),
            ("radius", SEARCH_RADIUS_M.to_string()),
            ("order_by", "distance".to_string()),
        ]);

        let response: OpenAqResponse = fetch_json(request).await?;
        match Self::extract(&response) {
            Some(reading) if !reading.is_empty() => Ok(reading),
            _ => Err(ProviderError::NoData),
        }
    }

    fn source_label(&self) -> &'static str {
        "(OpenAQ)"
    }
}
